use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_WINDOW_CAPACITY: usize = 1000;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(500);

/// Loss percentage at or above which the final verdict is a warning.
pub const WARN_LOSS_PERCENT: f64 = 3.0;

pub const DEFAULT_ENDPOINTS: &[&str] = &[
    // Search engines
    "google.com",
    "bing.com",
    "yahoo.com",
    "duckduckgo.com",
    // Tech companies
    "microsoft.com",
    "apple.com",
    "amazon.com",
    "aws.amazon.com",
    // Public DNS servers
    "1.1.1.1",
    "8.8.8.8",
    "9.9.9.9",
    "208.67.222.222",
    // Languages
    "python.org",
    "go.dev",
    "ruby-lang.org",
    // Niche
    "myanimelist.net",
];

pub fn default_endpoints() -> Vec<String> {
    DEFAULT_ENDPOINTS.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("window capacity must be greater than zero (got {value})")]
    InvalidWindowCapacity { value: i64 },
    #[error("tick interval must be greater than zero")]
    InvalidTickInterval,
    #[error("probe timeout must be greater than zero")]
    InvalidProbeTimeout,
    #[error("endpoint catalog is empty")]
    EmptyCatalog,
    #[error("probe program `{program}` was not found on PATH")]
    ProberUnavailable { program: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SamplerConfig {
    pub window_capacity: usize,
    pub tick_interval: Duration,
    pub probe_timeout: Duration,
    /// Wall-clock budget measured from the start of the run. `None` runs
    /// until cancelled.
    pub run_for: Option<Duration>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            tick_interval: DEFAULT_TICK_INTERVAL,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            run_for: None,
        }
    }
}

impl SamplerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_capacity == 0 {
            return Err(ConfigError::InvalidWindowCapacity { value: 0 });
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::InvalidTickInterval);
        }
        if self.probe_timeout.is_zero() {
            return Err(ConfigError::InvalidProbeTimeout);
        }
        Ok(())
    }
}
