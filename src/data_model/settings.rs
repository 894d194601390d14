use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Values taken from the command line. `None` defers to the config file or
/// the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    pub run_for: Option<Duration>,
    pub window_capacity: Option<usize>,
}
