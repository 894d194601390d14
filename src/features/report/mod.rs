mod format;
mod terminal;

pub use terminal::TerminalReporter;

use crate::endpoint::EndpointStats;
use crate::features::window::LossRatio;

/// Sink for the sampler's running and final statistics.
pub trait Reporter {
    /// Called once per tick with the current window ratio.
    fn report_progress(&mut self, window: LossRatio, capacity: usize);

    /// Called exactly once when sampling ends. `overall` is `None` when no
    /// probe completed.
    fn report_final(&mut self, endpoints: &[EndpointStats], overall: Option<LossRatio>);

    /// Called when an interrupt has been observed, before `report_final`.
    fn report_interrupted(&mut self) {}
}
