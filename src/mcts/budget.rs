//! Shared search budget.
//!
//! The budget is the only state shared between workers. Every worker asks
//! it for permission before starting a simulation; once it says no, it keeps
//! saying no for the rest of the decision.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use super::config::{IterationScope, ValidatedLimits};

/// Iteration counter, deadline and stop flag shared by all workers of one
/// decision.
#[derive(Debug)]
pub struct SearchBudget {
    max_iterations: Option<u64>,
    scope: IterationScope,
    started_at: Instant,
    deadline: Option<Instant>,
    claimed: AtomicU64,
    stop: AtomicBool,
}

impl SearchBudget {
    /// Create a budget that starts counting time now.
    pub fn new(limits: ValidatedLimits, scope: IterationScope) -> Self {
        let started_at = Instant::now();
        Self {
            max_iterations: limits.max_iterations,
            scope,
            started_at,
            deadline: limits.max_time.map(|t| started_at + t),
            claimed: AtomicU64::new(0),
            stop: AtomicBool::new(false),
        }
    }

    /// Ask to start one more simulation.
    ///
    /// `worker_iterations` is the number of simulations the calling worker
    /// has already completed; it only matters for
    /// [`IterationScope::PerWorker`].
    ///
    /// The very first request of a decision is always granted so that every
    /// decision is backed by at least one simulation.
    pub fn try_begin(&self, worker_iterations: u64) -> bool {
        if self.stop.load(Ordering::Acquire) {
            return false;
        }

        if let Some(deadline) = self.deadline {
            if self.claimed.load(Ordering::Relaxed) > 0 && Instant::now() >= deadline {
                self.stop();
                return false;
            }
        }

        match (self.max_iterations, self.scope) {
            (Some(max), IterationScope::Aggregate) => {
                let claim = self
                    .claimed
                    .fetch_update(Ordering::AcqRel, Ordering::Relaxed, |n| {
                        (n < max).then_some(n + 1)
                    });
                if claim.is_err() {
                    self.stop();
                    return false;
                }
            }
            (Some(max), IterationScope::PerWorker) => {
                if worker_iterations >= max {
                    return false;
                }
                self.claimed.fetch_add(1, Ordering::AcqRel);
            }
            (None, _) => {
                self.claimed.fetch_add(1, Ordering::AcqRel);
            }
        }

        true
    }

    /// Stop all workers at their next iteration boundary.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Whether the stop flag has been raised.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Number of simulations granted so far.
    #[must_use]
    pub fn claimed(&self) -> u64 {
        self.claimed.load(Ordering::Acquire)
    }

    /// Time since the budget was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(iterations: Option<u64>, time: Option<Duration>) -> ValidatedLimits {
        ValidatedLimits {
            max_iterations: iterations,
            max_time: time,
        }
    }

    #[test]
    fn test_aggregate_iterations() {
        let budget = SearchBudget::new(limits(Some(3), None), IterationScope::Aggregate);
        assert!(budget.try_begin(0));
        assert!(budget.try_begin(0));
        assert!(budget.try_begin(5));
        assert!(!budget.try_begin(0));
        assert!(budget.is_stopped());
        assert_eq!(budget.claimed(), 3);
    }

    #[test]
    fn test_per_worker_iterations() {
        let budget = SearchBudget::new(limits(Some(2), None), IterationScope::PerWorker);
        assert!(budget.try_begin(0));
        assert!(budget.try_begin(1));
        assert!(!budget.try_begin(2));

        // Another worker still has its own allowance
        assert!(budget.try_begin(0));
        assert!(!budget.is_stopped());
        assert_eq!(budget.claimed(), 3);
    }

    #[test]
    fn test_deadline() {
        let budget = SearchBudget::new(
            limits(None, Some(Duration::from_millis(20))),
            IterationScope::Aggregate,
        );
        assert!(budget.try_begin(0));
        std::thread::sleep(Duration::from_millis(30));
        assert!(!budget.try_begin(1));
        assert!(budget.is_stopped());
        assert!(budget.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_first_iteration_always_granted() {
        let budget = SearchBudget::new(
            limits(None, Some(Duration::from_nanos(1))),
            IterationScope::Aggregate,
        );
        std::thread::sleep(Duration::from_millis(1));
        assert!(budget.try_begin(0));
        assert!(!budget.try_begin(1));
    }

    #[test]
    fn test_stop_is_sticky() {
        let budget = SearchBudget::new(limits(Some(100), None), IterationScope::Aggregate);
        budget.stop();
        assert!(!budget.try_begin(0));
        assert_eq!(budget.claimed(), 0);
    }

    #[test]
    fn test_concurrent_claims_are_exact() {
        let budget = SearchBudget::new(limits(Some(1000), None), IterationScope::Aggregate);
        let granted: u64 = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        let mut n = 0;
                        while budget.try_begin(n) {
                            n += 1;
                        }
                        n
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });
        assert_eq!(granted, 1000);
    }
}
