use super::{RunSummary, Sampler, SamplerState, StopReason};
use crate::common::signal::CancellationToken;
use crate::common::time::Clock;
use crate::config::{ConfigError, SamplerConfig};
use crate::endpoint::{EndpointRegistry, EndpointStats};
use crate::features::probe::{ProbeError, ProbeReply};
use crate::features::report::Reporter;
use crate::features::selector::EndpointSelector;
use crate::features::window::LossRatio;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

struct ManualClock {
    origin: Instant,
    offset: Cell<Duration>,
    sleeps: RefCell<Vec<Duration>>,
}

impl ManualClock {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            origin: Instant::now(),
            offset: Cell::new(Duration::ZERO),
            sleeps: RefCell::new(Vec::new()),
        })
    }

    fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        self.advance(duration);
    }
}

#[derive(Default)]
struct RecordingReporter {
    progress: Vec<(LossRatio, usize)>,
    finals: Vec<(Vec<EndpointStats>, Option<LossRatio>)>,
    interrupted: usize,
}

impl Reporter for RecordingReporter {
    fn report_progress(&mut self, window: LossRatio, capacity: usize) {
        self.progress.push((window, capacity));
    }

    fn report_final(&mut self, endpoints: &[EndpointStats], overall: Option<LossRatio>) {
        self.finals.push((endpoints.to_vec(), overall));
    }

    fn report_interrupted(&mut self) {
        self.interrupted += 1;
    }
}

fn config(capacity: usize, run_for: Option<Duration>) -> SamplerConfig {
    SamplerConfig {
        window_capacity: capacity,
        run_for,
        ..SamplerConfig::default()
    }
}

fn registry() -> EndpointRegistry {
    EndpointRegistry::new(["1.1.1.1", "8.8.8.8", "9.9.9.9"]).expect("registry")
}

fn sampler<P>(config: SamplerConfig, prober: P) -> Sampler<P, StdRng>
where
    P: FnMut(&str) -> Result<ProbeReply, ProbeError>,
{
    Sampler::with_selector(
        config,
        registry(),
        prober,
        EndpointSelector::with_rng(StdRng::seed_from_u64(11)),
    )
    .expect("sampler")
}

fn reachable(_: &str) -> Result<ProbeReply, ProbeError> {
    Ok(ProbeReply { reachable: true })
}

#[test]
fn new_rejects_zero_window_capacity() {
    let result = Sampler::new(config(0, None), registry(), reachable);
    assert!(matches!(
        result,
        Err(ConfigError::InvalidWindowCapacity { value: 0 })
    ));
}

#[test]
fn zero_deadline_probes_nothing_and_reports_once() {
    let clock = ManualClock::new();
    let mut reporter = RecordingReporter::default();
    let mut sampler = sampler(config(10, Some(Duration::ZERO)), reachable);

    let summary = sampler.run(&mut reporter, clock.as_ref(), &CancellationToken::new());

    assert_eq!(
        summary,
        RunSummary {
            reason: StopReason::DeadlineReached,
            probes: 0,
        }
    );
    assert_eq!(sampler.state(), SamplerState::Terminated);
    assert!(reporter.progress.is_empty());
    assert_eq!(reporter.finals.len(), 1);
    let (endpoints, overall) = &reporter.finals[0];
    assert_eq!(endpoints.len(), 3);
    assert!(endpoints.iter().all(|stats| stats.total == 0));
    assert_eq!(*overall, None);
}

#[test]
fn deadline_bounds_number_of_ticks() {
    let clock = ManualClock::new();
    let mut reporter = RecordingReporter::default();
    let mut sampler = sampler(config(10, Some(Duration::from_secs(2))), reachable);

    let summary = sampler.run(&mut reporter, clock.as_ref(), &CancellationToken::new());

    assert_eq!(summary.reason, StopReason::DeadlineReached);
    assert_eq!(summary.probes, 4);
    assert_eq!(reporter.progress.len(), 4);
    assert_eq!(reporter.finals.len(), 1);
    assert_eq!(clock.elapsed(), Duration::from_secs(2));
}

#[test]
fn sleep_compensates_for_probe_latency() {
    let clock = ManualClock::new();
    let probe_clock = Rc::clone(&clock);
    let mut reporter = RecordingReporter::default();
    let mut sampler = sampler(
        config(10, Some(Duration::from_secs(1))),
        move |_: &str| {
            probe_clock.advance(Duration::from_millis(200));
            Ok(ProbeReply { reachable: true })
        },
    );

    let summary = sampler.run(&mut reporter, clock.as_ref(), &CancellationToken::new());

    assert_eq!(summary.probes, 2);
    assert_eq!(
        *clock.sleeps.borrow(),
        vec![Duration::from_millis(300), Duration::from_millis(300)]
    );
}

#[test]
fn probe_slower_than_tick_does_not_sleep() {
    let clock = ManualClock::new();
    let probe_clock = Rc::clone(&clock);
    let mut reporter = RecordingReporter::default();
    let mut sampler = sampler(
        config(10, Some(Duration::from_secs(1))),
        move |_: &str| {
            probe_clock.advance(Duration::from_millis(700));
            Ok(ProbeReply { reachable: false })
        },
    );

    let summary = sampler.run(&mut reporter, clock.as_ref(), &CancellationToken::new());

    assert_eq!(summary.probes, 2);
    assert!(clock.sleeps.borrow().iter().all(Duration::is_zero));
    assert_eq!(
        sampler.window().loss_ratio(),
        Some(LossRatio {
            failed: 2,
            total: 2,
        })
    );
}

#[test]
fn cancellation_during_probe_still_records_outcome() {
    let clock = ManualClock::new();
    let cancel = CancellationToken::new();
    let probe_cancel = cancel.clone();
    let mut reporter = RecordingReporter::default();
    let mut sampler = sampler(config(10, None), move |_: &str| {
        probe_cancel.cancel();
        Ok(ProbeReply { reachable: false })
    });

    let summary = sampler.run(&mut reporter, clock.as_ref(), &cancel);

    assert_eq!(summary.reason, StopReason::Cancelled);
    assert_eq!(summary.probes, 1);
    assert_eq!(sampler.window().len(), 1);
    assert_eq!(sampler.window().failed(), 1);
    assert_eq!(reporter.progress.len(), 1);
    assert_eq!(reporter.interrupted, 1);
    assert_eq!(reporter.finals.len(), 1);
    assert_eq!(
        reporter.finals[0].1,
        Some(LossRatio {
            failed: 1,
            total: 1,
        })
    );
    assert_eq!(sampler.state(), SamplerState::Terminated);
}

#[test]
fn cancelled_before_first_tick_reports_empty_summary() {
    let clock = ManualClock::new();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut reporter = RecordingReporter::default();
    let mut sampler = sampler(config(10, None), reachable);

    let summary = sampler.run(&mut reporter, clock.as_ref(), &cancel);

    assert_eq!(summary.probes, 0);
    assert_eq!(summary.reason, StopReason::Cancelled);
    assert_eq!(reporter.finals.len(), 1);
    assert_eq!(reporter.finals[0].1, None);
}

#[test]
fn window_slides_while_endpoint_totals_keep_growing() {
    let clock = ManualClock::new();
    let cancel = CancellationToken::new();
    let probe_cancel = cancel.clone();
    let addresses = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&addresses);
    let mut reporter = RecordingReporter::default();
    let mut sampler = sampler(config(3, None), move |address: &str| {
        let mut seen = seen.borrow_mut();
        seen.push(address.to_string());
        if seen.len() == 8 {
            probe_cancel.cancel();
        }
        // Only the first probe fails, so it must age out of a 3-slot window.
        Ok(ProbeReply {
            reachable: seen.len() > 1,
        })
    });

    let summary = sampler.run(&mut reporter, clock.as_ref(), &cancel);

    assert_eq!(summary.probes, 8);
    assert_eq!(sampler.window().len(), 3);
    assert_eq!(sampler.window().failed(), 0);
    assert_eq!(reporter.progress[0], (LossRatio { failed: 1, total: 1 }, 3));
    assert!(reporter.progress.iter().all(|(ratio, _)| ratio.total <= 3));

    let totals: u64 = sampler.registry().iter().map(|e| e.total_probes()).sum();
    let failed: u64 = sampler.registry().iter().map(|e| e.failed_probes()).sum();
    assert_eq!(totals, 8);
    assert_eq!(failed, 1);

    let addresses = addresses.borrow();
    assert!(addresses.windows(2).all(|pair| pair[0] != pair[1]));
}

#[test]
fn budget_beyond_instant_range_runs_until_cancelled() {
    let clock = ManualClock::new();
    let mut reporter = RecordingReporter::default();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let mut calls = 0;
    let prober = move |_: &str| -> Result<ProbeReply, ProbeError> {
        calls += 1;
        if calls == 3 {
            trigger.cancel();
        }
        Ok(ProbeReply { reachable: true })
    };
    let mut sampler = sampler(config(10, Some(Duration::from_secs(i64::MAX as u64))), prober);

    let summary = sampler.run(&mut reporter, clock.as_ref(), &cancel);

    assert_eq!(
        summary,
        RunSummary {
            reason: StopReason::Cancelled,
            probes: 3,
        }
    );
    assert_eq!(reporter.interrupted, 1);
    assert_eq!(reporter.finals.len(), 1);
}

#[test]
fn terminated_sampler_does_not_run_again() {
    let clock = ManualClock::new();
    let mut reporter = RecordingReporter::default();
    let mut sampler = sampler(config(10, Some(Duration::from_secs(1))), reachable);

    let first = sampler.run(&mut reporter, clock.as_ref(), &CancellationToken::new());
    let progress_after_first = reporter.progress.len();
    let elapsed_after_first = clock.elapsed();

    let second = sampler.run(&mut reporter, clock.as_ref(), &CancellationToken::new());

    assert_eq!(first, second);
    assert_eq!(first.probes, 2);
    assert_eq!(sampler.state(), SamplerState::Terminated);
    assert_eq!(reporter.finals.len(), 1);
    assert_eq!(reporter.progress.len(), progress_after_first);
    assert_eq!(clock.elapsed(), elapsed_after_first);
    let totals: u64 = sampler.registry().iter().map(|e| e.total_probes()).sum();
    assert_eq!(totals, 2);
}
