use crate::config::ConfigError;
use std::collections::HashSet;
use std::ops::{Index, IndexMut};

/// A probe target with all-time counters. Unlike the loss window these are
/// never evicted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    address: String,
    total_probes: u64,
    failed_probes: u64,
}

impl Endpoint {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            total_probes: 0,
            failed_probes: 0,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn total_probes(&self) -> u64 {
        self.total_probes
    }

    pub fn failed_probes(&self) -> u64 {
        self.failed_probes
    }

    /// Counts one probe of this endpoint.
    pub fn record(&mut self, success: bool) {
        self.total_probes = self.total_probes.saturating_add(1);
        if !success {
            self.failed_probes = self.failed_probes.saturating_add(1);
        }
    }

    pub fn stats(&self) -> EndpointStats {
        EndpointStats {
            address: self.address.clone(),
            total: self.total_probes,
            failed: self.failed_probes,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointStats {
    pub address: String,
    pub total: u64,
    pub failed: u64,
}

/// Non-empty, duplicate-free catalog of endpoints in configuration order.
#[derive(Clone, Debug)]
pub struct EndpointRegistry {
    endpoints: Vec<Endpoint>,
}

impl EndpointRegistry {
    pub fn new<I, S>(addresses: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut endpoints = Vec::new();
        for address in addresses {
            let address: String = address.into();
            let address = address.trim().to_string();
            if address.is_empty() {
                continue;
            }
            if !seen.insert(address.clone()) {
                tracing::warn!(address = %address, "Ignoring duplicate endpoint");
                continue;
            }
            endpoints.push(Endpoint::new(address));
        }

        if endpoints.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        Ok(Self { endpoints })
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Never true for a registry built by `new`.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }

    pub fn stats(&self) -> Vec<EndpointStats> {
        self.endpoints.iter().map(Endpoint::stats).collect()
    }
}

impl Index<usize> for EndpointRegistry {
    type Output = Endpoint;

    fn index(&self, index: usize) -> &Self::Output {
        &self.endpoints[index]
    }
}

impl IndexMut<usize> for EndpointRegistry {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.endpoints[index]
    }
}
