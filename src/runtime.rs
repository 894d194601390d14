use crate::common::signal::{CancellationToken, InterruptGuard};
use crate::common::time::Clock;
use crate::config::{ConfigError, SamplerConfig};
use crate::endpoint::EndpointRegistry;
use crate::features::probe::{ProbeExecutor, Prober};
use crate::features::report::Reporter;
use crate::features::selector::EndpointSelector;
use crate::features::window::LossWindow;
use rand::Rng;
use rand::rngs::StdRng;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SamplerState {
    Running,
    StopRequested,
    Terminated,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StopReason {
    Cancelled,
    DeadlineReached,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RunSummary {
    pub reason: StopReason,
    pub probes: u64,
}

/// Owns every piece of sampling state: the catalog, the loss window and the
/// selector. One probe per tick, strictly sequential.
pub struct Sampler<P, R = StdRng> {
    config: SamplerConfig,
    registry: EndpointRegistry,
    window: LossWindow,
    selector: EndpointSelector<R>,
    executor: ProbeExecutor<P>,
    state: SamplerState,
    summary: Option<RunSummary>,
}

impl<P: Prober> Sampler<P, StdRng> {
    pub fn new(
        config: SamplerConfig,
        registry: EndpointRegistry,
        prober: P,
    ) -> Result<Self, ConfigError> {
        Self::with_selector(config, registry, prober, EndpointSelector::new())
    }
}

impl<P: Prober, R: Rng> Sampler<P, R> {
    pub fn with_selector(
        config: SamplerConfig,
        registry: EndpointRegistry,
        prober: P,
        selector: EndpointSelector<R>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let window = LossWindow::new(config.window_capacity)?;
        Ok(Self {
            config,
            registry,
            window,
            selector,
            executor: ProbeExecutor::new(prober),
            state: SamplerState::Running,
            summary: None,
        })
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    pub fn window(&self) -> &LossWindow {
        &self.window
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    /// Samples until `cancel` fires or the configured budget runs out, then
    /// emits the final report exactly once.
    ///
    /// Cancellation is only observed between ticks; a probe already in
    /// flight completes and is recorded. A terminated sampler does not run
    /// again: later calls return the first summary and report nothing.
    pub fn run(
        &mut self,
        reporter: &mut dyn Reporter,
        clock: &dyn Clock,
        cancel: &CancellationToken,
    ) -> RunSummary {
        if let Some(summary) = self.summary {
            tracing::debug!(reason = ?summary.reason, "Sampler already terminated");
            return summary;
        }

        let started = clock.now();
        // A budget past the end of `Instant`'s range never expires.
        let deadline = self
            .config
            .run_for
            .and_then(|budget| started.checked_add(budget));
        let mut probes = 0u64;

        let reason = loop {
            let tick_start = clock.now();
            if cancel.is_cancelled() {
                self.state = SamplerState::StopRequested;
                reporter.report_interrupted();
                break StopReason::Cancelled;
            }
            if let Some(deadline) = deadline
                && tick_start >= deadline
            {
                break StopReason::DeadlineReached;
            }

            self.tick(reporter);
            probes += 1;

            let elapsed = clock.now().saturating_duration_since(tick_start);
            clock.sleep(self.config.tick_interval.saturating_sub(elapsed));
        };

        self.state = SamplerState::Terminated;
        tracing::info!(?reason, probes, "Sampling stopped");
        reporter.report_final(&self.registry.stats(), self.window.loss_ratio());

        let summary = RunSummary { reason, probes };
        self.summary = Some(summary);
        summary
    }

    fn tick(&mut self, reporter: &mut dyn Reporter) {
        let index = self.selector.select(&self.registry);
        let success = self.executor.probe(&mut self.registry[index]);
        self.window.push(success);

        if let Some(ratio) = self.window.loss_ratio() {
            reporter.report_progress(ratio, self.window.capacity());
        }
    }
}

/// Runs `sampler` with Ctrl+C wired to cancellation. The handler is removed
/// on every exit path when the guard drops.
pub fn run_interruptible<P: Prober, R: Rng>(
    sampler: &mut Sampler<P, R>,
    reporter: &mut dyn Reporter,
    clock: &dyn Clock,
) -> RunSummary {
    let cancel = CancellationToken::new();
    let _guard = match InterruptGuard::install(&cancel) {
        Ok(guard) => Some(guard),
        Err(err) => {
            tracing::warn!(error = %err, "Interrupt handler unavailable; Ctrl+C will not print a summary");
            None
        }
    };

    tracing::info!(
        endpoints = sampler.registry().len(),
        window = sampler.config().window_capacity,
        run_for = ?sampler.config().run_for,
        "Sampling started"
    );
    sampler.run(reporter, clock, &cancel)
}

#[cfg(test)]
mod tests;
