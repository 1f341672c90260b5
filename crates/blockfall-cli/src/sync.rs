use std::time::{Duration, Instant};

use blockfall_store::{StoredWeights, WeightStore};

/// Periodic weight synchronization task.
///
/// Polled from the single-threaded game loop: on each due poll it re-reads
/// the persisted weight vector and reports it back only when it differs
/// from the currently loaded one (weights or generation). The task is
/// cancellable; once cancelled it never polls the store again. Load
/// failures are logged and skipped, they never interrupt play.
#[derive(Debug)]
pub struct WeightSync {
    interval: Duration,
    next_due: Instant,
    cancelled: bool,
}

impl WeightSync {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: Instant::now(),
            cancelled: false,
        }
    }

    /// Cancels the task; subsequent polls are no-ops.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Polls the store if the interval has elapsed.
    ///
    /// Returns `Some` with the freshly loaded state when it differs from
    /// `current`, `None` otherwise.
    pub fn poll<S>(&mut self, store: &S, current: &StoredWeights) -> Option<StoredWeights>
    where
        S: WeightStore + ?Sized,
    {
        if self.cancelled || Instant::now() < self.next_due {
            return None;
        }
        self.next_due = Instant::now() + self.interval;

        match store.load() {
            Ok(loaded) if loaded != *current => {
                tracing::info!(generation = loaded.generation, "weights updated during play");
                Some(loaded)
            }
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(error = %err, "weight sync failed, keeping current weights");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_evaluator::WeightVector;
    use blockfall_store::MemoryWeightStore;

    use super::*;

    fn changed_weights() -> WeightVector {
        WeightVector {
            lines: 2.0,
            ..WeightVector::DEFAULT
        }
    }

    #[test]
    fn test_poll_reports_only_differences() {
        let store = MemoryWeightStore::default();
        let mut sync = WeightSync::new(Duration::ZERO);
        let current = StoredWeights::default();

        // Store content equals current state: nothing to report.
        assert_eq!(sync.poll(&store, &current), None);

        store.save(&changed_weights(), 1).unwrap();
        let update = sync.poll(&store, &current).expect("update expected");
        assert_eq!(update.generation, 1);
        assert_eq!(update.weights, changed_weights());
    }

    #[test]
    fn test_poll_detects_generation_only_change() {
        let store = MemoryWeightStore::default();
        let mut sync = WeightSync::new(Duration::ZERO);
        let current = StoredWeights::default();

        store.save(&current.weights, 2).unwrap();
        let update = sync.poll(&store, &current).expect("update expected");
        assert_eq!(update.generation, 2);
    }

    #[test]
    fn test_cancelled_sync_never_polls() {
        let store = MemoryWeightStore::default();
        let mut sync = WeightSync::new(Duration::ZERO);
        store.save(&changed_weights(), 1).unwrap();

        sync.cancel();
        assert_eq!(sync.poll(&store, &StoredWeights::default()), None);
    }

    #[test]
    fn test_poll_respects_interval() {
        let store = MemoryWeightStore::default();
        let mut sync = WeightSync::new(Duration::from_secs(3600));
        store.save(&changed_weights(), 1).unwrap();
        let current = StoredWeights::default();

        // First poll is due immediately; the next one is an hour away.
        assert!(sync.poll(&store, &current).is_some());
        assert_eq!(sync.poll(&store, &current), None);
    }
}
