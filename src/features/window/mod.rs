use crate::config::ConfigError;
use std::fmt;

/// Failed-over-total ratio for some counting scope.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LossRatio {
    pub failed: u64,
    pub total: u64,
}

impl LossRatio {
    pub fn fraction(self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.failed as f64 / self.total as f64
        }
    }

    pub fn percent(self) -> f64 {
        self.fraction() * 100.0
    }
}

impl fmt::Display for LossRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.failed, self.total)
    }
}

/// Fixed-capacity record of the most recent probe outcomes.
///
/// Outcomes live in a ring buffer allocated once at construction. `head`
/// points at the oldest slot, and once the buffer is full every push
/// overwrites that slot and advances `head`, so both insert and eviction
/// are O(1) with no allocation. `failed` mirrors the number of `false`
/// outcomes currently resident.
#[derive(Clone, Debug)]
pub struct LossWindow {
    slots: Box<[bool]>,
    head: usize,
    len: usize,
    failed: usize,
}

impl LossWindow {
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::InvalidWindowCapacity { value: 0 });
        }
        Ok(Self {
            slots: vec![true; capacity].into_boxed_slice(),
            head: 0,
            len: 0,
            failed: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[cfg(test)]
    pub(crate) fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    #[cfg(test)]
    pub(crate) fn failed(&self) -> usize {
        self.failed
    }

    pub fn push(&mut self, success: bool) {
        let capacity = self.capacity();
        if self.len < capacity {
            let tail = (self.head + self.len) % capacity;
            self.slots[tail] = success;
            self.len += 1;
        } else {
            if !self.slots[self.head] {
                self.failed -= 1;
            }
            self.slots[self.head] = success;
            self.head = (self.head + 1) % capacity;
        }

        if !success {
            self.failed += 1;
        }
    }

    /// `None` until the first outcome is recorded.
    pub fn loss_ratio(&self) -> Option<LossRatio> {
        if self.len == 0 {
            return None;
        }
        Some(LossRatio {
            failed: self.failed as u64,
            total: self.len as u64,
        })
    }

    /// Resident outcomes, oldest first.
    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        let capacity = self.capacity();
        (0..self.len).map(move |offset| self.slots[(self.head + offset) % capacity])
    }
}
