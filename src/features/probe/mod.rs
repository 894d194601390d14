mod command;
mod helpers;

pub use command::CommandProber;

use crate::endpoint::Endpoint;
use std::io;
use std::time::Duration;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ProbeReply {
    pub reachable: bool,
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("failed waiting for probe process: {0}")]
    Wait(#[source] io::Error),
    #[error("probe of {address} did not finish within {after:?}")]
    Timeout { address: String, after: Duration },
}

/// Something that can test whether an address answers an ICMP echo.
pub trait Prober {
    fn execute(&mut self, address: &str) -> Result<ProbeReply, ProbeError>;
}

impl<F> Prober for F
where
    F: FnMut(&str) -> Result<ProbeReply, ProbeError>,
{
    fn execute(&mut self, address: &str) -> Result<ProbeReply, ProbeError> {
        self(address)
    }
}

/// Runs one probe per call and folds every failure mode into `false`.
pub struct ProbeExecutor<P> {
    prober: P,
}

impl<P: Prober> ProbeExecutor<P> {
    pub fn new(prober: P) -> Self {
        Self { prober }
    }

    pub fn probe(&mut self, endpoint: &mut Endpoint) -> bool {
        let success = match self.prober.execute(endpoint.address()) {
            Ok(reply) => {
                if !reply.reachable {
                    tracing::debug!(address = %endpoint.address(), "Endpoint unreachable");
                }
                reply.reachable
            }
            Err(err) => {
                tracing::debug!(
                    address = %endpoint.address(),
                    error = %err,
                    "Probe failed"
                );
                false
            }
        };

        endpoint.record(success);
        success
    }
}
