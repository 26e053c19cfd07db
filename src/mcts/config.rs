//! Search configuration parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::SearchError;

/// How `max_iterations` is counted across workers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IterationScope {
    /// `max_iterations` bounds the total number of simulations of all
    /// workers together.
    #[default]
    Aggregate,
    /// Every worker runs up to `max_iterations` simulations on its own.
    PerWorker,
}

/// Search configuration parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Simulation budget (`None` = unbounded, requires `max_time`).
    /// Counted according to `iteration_scope`.
    pub max_iterations: Option<u64>,

    /// Wall-clock budget in seconds (`None` = unbounded, requires
    /// `max_iterations`). If both are set, whichever is hit first stops
    /// the search.
    pub max_time: Option<f64>,

    /// Number of parallel workers, each with its own tree.
    pub number_of_threads: usize,

    /// Log merged per-move statistics after every decision.
    pub verbose: bool,

    /// UCB1 exploration constant (default: sqrt(2) = 1.414).
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f64,

    /// Random seed for the worker RNGs.
    /// Same seed and a single thread produce deterministic searches.
    pub seed: u64,

    /// Whether `max_iterations` is shared or per worker.
    pub iteration_scope: IterationScope,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: Some(10_000),
            max_time: None,
            number_of_threads: 8,
            verbose: false,
            exploration_constant: std::f64::consts::SQRT_2,
            seed: 42,
            iteration_scope: IterationScope::Aggregate,
        }
    }
}

impl SearchConfig {
    /// Set the iteration budget.
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Remove the iteration budget (time budget only).
    pub fn without_iteration_limit(mut self) -> Self {
        self.max_iterations = None;
        self
    }

    /// Set the wall-clock budget in seconds.
    pub fn with_max_time(mut self, seconds: f64) -> Self {
        self.max_time = Some(seconds);
        self
    }

    /// Set the number of worker threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.number_of_threads = threads;
        self
    }

    /// Enable or disable verbose reporting.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set a custom exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Set a custom seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set how the iteration budget is counted.
    pub fn with_iteration_scope(mut self, scope: IterationScope) -> Self {
        self.iteration_scope = scope;
        self
    }

    /// Check that the configuration yields a usable budget.
    ///
    /// Non-positive or non-finite limits count as unset. At least one of
    /// `max_iterations`/`max_time` must remain, and at least one thread is
    /// required.
    pub fn validate(&self) -> Result<ValidatedLimits, SearchError> {
        if self.number_of_threads == 0 {
            return Err(SearchError::BudgetMisconfiguration(
                "number_of_threads must be at least 1".to_string(),
            ));
        }

        if !(self.exploration_constant.is_finite() && self.exploration_constant >= 0.0) {
            return Err(SearchError::BudgetMisconfiguration(format!(
                "exploration constant {} is not a finite non-negative number",
                self.exploration_constant
            )));
        }

        let max_iterations = self.max_iterations.filter(|&n| n > 0);
        let max_time = self
            .max_time
            .filter(|t| t.is_finite() && *t > 0.0)
            .map(Duration::from_secs_f64);

        if max_iterations.is_none() && max_time.is_none() {
            return Err(SearchError::BudgetMisconfiguration(format!(
                "neither max_iterations ({:?}) nor max_time ({:?}) is a positive finite bound",
                self.max_iterations, self.max_time
            )));
        }

        Ok(ValidatedLimits {
            max_iterations,
            max_time,
        })
    }
}

/// Budget limits that passed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidatedLimits {
    pub max_iterations: Option<u64>,
    pub max_time: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert!((config.exploration_constant - std::f64::consts::SQRT_2).abs() < 0.001);
        assert_eq!(config.max_iterations, Some(10_000));
        assert_eq!(config.max_time, None);
        assert_eq!(config.number_of_threads, 8);
        assert_eq!(config.seed, 42);
        assert_eq!(config.iteration_scope, IterationScope::Aggregate);
        assert!(!config.verbose);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SearchConfig::default()
            .with_exploration(2.0)
            .with_seed(123)
            .with_threads(2)
            .with_max_time(0.5)
            .with_iteration_scope(IterationScope::PerWorker);

        assert_eq!(config.exploration_constant, 2.0);
        assert_eq!(config.seed, 123);
        assert_eq!(config.number_of_threads, 2);
        assert_eq!(config.max_time, Some(0.5));
        assert_eq!(config.iteration_scope, IterationScope::PerWorker);
    }

    #[test]
    fn test_validate_default() {
        let limits = SearchConfig::default().validate().unwrap();
        assert_eq!(limits.max_iterations, Some(10_000));
        assert_eq!(limits.max_time, None);
    }

    #[test]
    fn test_validate_time_only() {
        let limits = SearchConfig::default()
            .without_iteration_limit()
            .with_max_time(1.5)
            .validate()
            .unwrap();
        assert_eq!(limits.max_iterations, None);
        assert_eq!(limits.max_time, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_validate_rejects_missing_budget() {
        let config = SearchConfig::default().without_iteration_limit();
        assert!(matches!(
            config.validate(),
            Err(SearchError::BudgetMisconfiguration(_))
        ));

        let config = SearchConfig::default().with_max_iterations(0).with_max_time(-1.0);
        assert!(matches!(
            config.validate(),
            Err(SearchError::BudgetMisconfiguration(_))
        ));

        let config = SearchConfig::default()
            .without_iteration_limit()
            .with_max_time(f64::INFINITY);
        assert!(matches!(
            config.validate(),
            Err(SearchError::BudgetMisconfiguration(_))
        ));
    }

    #[test]
    fn test_validate_ignores_disabled_limit() {
        // A disabled time limit does not invalidate a good iteration limit
        let limits = SearchConfig::default()
            .with_max_iterations(10)
            .with_max_time(-1.0)
            .validate()
            .unwrap();
        assert_eq!(limits.max_iterations, Some(10));
        assert_eq!(limits.max_time, None);
    }

    #[test]
    fn test_validate_rejects_zero_threads() {
        let config = SearchConfig::default().with_threads(0);
        assert!(matches!(
            config.validate(),
            Err(SearchError::BudgetMisconfiguration(_))
        ));
    }

    #[test]
    fn test_serialization() {
        let config = SearchConfig::default().with_seed(7).with_max_time(2.0);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.seed, 7);
        assert_eq!(deserialized.max_time, Some(2.0));
        assert_eq!(deserialized.iteration_scope, config.iteration_scope);
    }
}
