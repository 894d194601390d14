use crate::endpoint::EndpointRegistry;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks a uniformly random endpoint each tick, never the same one twice in a
/// row unless the catalog only has one entry.
pub struct EndpointSelector<R = StdRng> {
    rng: R,
    last_selected: Option<usize>,
}

impl EndpointSelector<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for EndpointSelector<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> EndpointSelector<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            last_selected: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn last_selected(&self) -> Option<usize> {
        self.last_selected
    }

    /// Returns the position of the chosen endpoint in `registry`.
    ///
    /// The registry is duplicate-free, so position identifies the address.
    pub fn select(&mut self, registry: &EndpointRegistry) -> usize {
        let len = registry.len();
        let index = if len <= 1 {
            0
        } else {
            loop {
                let draw = self.rng.gen_range(0..len);
                if Some(draw) != self.last_selected {
                    break draw;
                }
            }
        };

        self.last_selected = Some(index);
        index
    }
}
