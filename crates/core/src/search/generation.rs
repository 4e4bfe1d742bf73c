//! Generation numbers for superseding fetches.

/// Numbers issued fetches and decides which completions may be applied.
///
/// Generations increase monotonically. Once a generation has settled
/// (successfully or not), every completion carrying an equal or lower number
/// is stale. The latest issued fetch is in flight until it settles.
#[derive(Debug, Clone, Default)]
pub struct GenerationTracker {
    issued: u64,
    settled: u64,
}

impl GenerationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the number for a new fetch.
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Records a completion. Returns `false` if it is stale and must be discarded.
    pub fn settle(&mut self, generation: u64) -> bool {
        if generation <= self.settled || generation > self.issued {
            return false;
        }
        self.settled = generation;
        true
    }

    /// True while the most recently issued fetch has not completed.
    pub fn is_latest_pending(&self) -> bool {
        self.settled < self.issued
    }

    pub fn latest_issued(&self) -> u64 {
        self.issued
    }

    pub fn latest_settled(&self) -> u64 {
        self.settled
    }
}
