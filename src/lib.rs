mod common;
mod features;

pub mod config;
pub mod data_model;
pub mod endpoint;
pub mod runtime;
pub mod settings;
pub mod storage;

pub use common::signal::{CancellationToken, InterruptGuard};
pub use common::time::{Clock, SystemClock};
pub use features::{probe, report, selector, window};
