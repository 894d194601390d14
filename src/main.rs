use pktloss::SystemClock;
use pktloss::config::SamplerConfig;
use pktloss::endpoint::EndpointRegistry;
use pktloss::probe::CommandProber;
use pktloss::report::TerminalReporter;
use pktloss::runtime::{Sampler, run_interruptible};
use pktloss::settings::{apply_persisted, apply_settings, load_from_cli};
use pktloss::storage;
use std::fmt::Display;
use std::io;
use tracing_subscriber::EnvFilter;

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let settings = load_from_cli().map_err(fatal)?;

    let persisted = storage::load();
    let mut config = SamplerConfig::default();
    apply_persisted(&persisted, &mut config);
    apply_settings(&settings, &mut config);
    config.validate().map_err(fatal)?;

    let registry = EndpointRegistry::new(persisted.catalog()).map_err(fatal)?;
    let prober = CommandProber::new(config.probe_timeout).map_err(fatal)?;
    tracing::info!(program = %prober.program().display(), "Using probe program");

    let mut reporter = TerminalReporter::stdout(config.window_capacity);
    let mut sampler = Sampler::new(config, registry, prober).map_err(fatal)?;
    run_interruptible(&mut sampler, &mut reporter, &SystemClock);
    Ok(())
}

fn fatal(err: impl Display) -> io::Error {
    tracing::error!(error = %err, "Cannot start sampling");
    io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
}
