use super::helpers::{WaitOutcome, find_in_path, timeout_millis, wait_with_deadline};
use super::{ProbeError, ProbeReply, Prober};
use crate::config::ConfigError;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

#[cfg(windows)]
const DEFAULT_PROGRAM: &str = "ping";
#[cfg(not(windows))]
const DEFAULT_PROGRAM: &str = "fping";

// Keeps the terminal's Ctrl+C away from an in-flight child.
#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

/// Extra time granted to the child beyond the echo timeout (name resolution,
/// process start-up) before it is killed.
const EXIT_GRACE: Duration = Duration::from_secs(2);

/// Probes by running the platform ping utility once per address.
///
/// Exit status zero means the address answered within `timeout`.
#[derive(Debug, Clone)]
pub struct CommandProber {
    program: PathBuf,
    timeout: Duration,
}

impl CommandProber {
    pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
        Self::with_program(DEFAULT_PROGRAM, timeout)
    }

    pub fn with_program(program: &str, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::InvalidProbeTimeout);
        }
        let program = find_in_path(program).ok_or_else(|| ConfigError::ProberUnavailable {
            program: program.to_string(),
        })?;
        Ok(Self { program, timeout })
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }

    fn command(&self, address: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(probe_args(address, self.timeout))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            cmd.creation_flags(CREATE_NEW_PROCESS_GROUP);
        }
        cmd
    }
}

impl Prober for CommandProber {
    fn execute(&mut self, address: &str) -> Result<ProbeReply, ProbeError> {
        let mut child = self
            .command(address)
            .spawn()
            .map_err(|source| ProbeError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        let limit = self.timeout + EXIT_GRACE;
        match wait_with_deadline(&mut child, limit).map_err(ProbeError::Wait)? {
            WaitOutcome::Exited(status) => Ok(ProbeReply {
                reachable: status.success(),
            }),
            WaitOutcome::TimedOut => Err(ProbeError::Timeout {
                address: address.to_string(),
                after: limit,
            }),
        }
    }
}

#[cfg(windows)]
fn probe_args(address: &str, timeout: Duration) -> Vec<String> {
    vec![
        "-n".to_string(),
        "1".to_string(),
        "-w".to_string(),
        timeout_millis(timeout),
        address.to_string(),
    ]
}

#[cfg(not(windows))]
fn probe_args(address: &str, timeout: Duration) -> Vec<String> {
    vec![
        "-c".to_string(),
        "1".to_string(),
        "-t".to_string(),
        timeout_millis(timeout),
        address.to_string(),
    ]
}
