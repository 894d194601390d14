use crate::config::{ConfigError, SamplerConfig};
use crate::data_model::settings::AppSettings;
use crate::storage::PersistedConfig;
use clap::Parser;
use std::time::Duration;
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "pktloss", version, allow_negative_numbers = true)]
#[command(about = "Live packet-loss sampler over a rotating set of public endpoints", long_about = None)]
pub struct CliArgs {
    /// Stop after this many seconds (omit or 0 to run until Ctrl+C)
    #[arg(value_name = "TIMEOUT_SECONDS", allow_hyphen_values = true)]
    timeout_seconds: Option<String>,

    /// Number of most recent probes the loss rate is computed over
    #[arg(value_name = "WINDOW_CAPACITY", allow_hyphen_values = true)]
    window_capacity: Option<String>,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub fn load_from_cli() -> Result<AppSettings, SettingsError> {
    let args = CliArgs::parse();
    from_args(args)
}

/// Unparsable values fall back to defaults; a parsable non-positive window
/// capacity is rejected.
pub fn from_args(args: CliArgs) -> Result<AppSettings, SettingsError> {
    let run_for = args
        .timeout_seconds
        .as_deref()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .filter(|secs| *secs > 0)
        .map(|secs| Duration::from_secs(secs.unsigned_abs()));

    let window_capacity = match args
        .window_capacity
        .as_deref()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
    {
        None => None,
        Some(value) if value <= 0 => {
            return Err(ConfigError::InvalidWindowCapacity { value }.into());
        }
        Some(value) => Some(
            usize::try_from(value).map_err(|_| ConfigError::InvalidWindowCapacity { value })?,
        ),
    };

    Ok(AppSettings {
        run_for,
        window_capacity,
    })
}

pub fn apply_persisted(persisted: &PersistedConfig, config: &mut SamplerConfig) {
    if let Some(capacity) = persisted.window_capacity {
        config.window_capacity = capacity;
    }
    if let Some(ms) = persisted.tick_interval_ms {
        config.tick_interval = Duration::from_millis(ms);
    }
    if let Some(ms) = persisted.probe_timeout_ms {
        config.probe_timeout = Duration::from_millis(ms);
    }
}

pub fn apply_settings(settings: &AppSettings, config: &mut SamplerConfig) {
    if let Some(capacity) = settings.window_capacity {
        config.window_capacity = capacity;
    }
    config.run_for = settings.run_for;
}
