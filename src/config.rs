//! Search stop conditions.

use std::time::Duration;

/// How long a call to `get_best_transition` keeps iterating.
///
/// The search stops at whichever limit is hit first, or earlier when the tree under the
/// current root has been explored completely. At least one iteration always runs.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of iterations per call.
    pub max_iterations: u32,

    /// Optional wall-clock budget per call.
    pub time_budget: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            time_budget: None,
        }
    }
}

impl SearchConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            max_iterations: 200,
            time_budget: None,
        }
    }

    /// Builder pattern: set the iteration limit.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.max_iterations = n;
        self
    }

    /// Builder pattern: set the wall-clock budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Returns true once either limit has been reached.
    pub fn is_exhausted(&self, iterations: u32, elapsed: Duration) -> bool {
        if iterations == 0 {
            return false;
        }
        iterations >= self.max_iterations
            || self.time_budget.is_some_and(|budget| elapsed >= budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.max_iterations, 1000);
        assert!(config.time_budget.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = SearchConfig::default()
            .with_iterations(10)
            .with_time_budget(Duration::from_millis(5));

        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.time_budget, Some(Duration::from_millis(5)));
    }

    #[test]
    fn test_limits() {
        let config = SearchConfig::default().with_iterations(3);
        assert!(!config.is_exhausted(2, Duration::ZERO));
        assert!(config.is_exhausted(3, Duration::ZERO));

        let timed = config.with_time_budget(Duration::from_millis(10));
        assert!(timed.is_exhausted(1, Duration::from_millis(10)));
        assert!(!timed.is_exhausted(1, Duration::from_millis(9)));
    }

    #[test]
    fn test_first_iteration_always_runs() {
        let config = SearchConfig::default()
            .with_iterations(0)
            .with_time_budget(Duration::ZERO);
        assert!(!config.is_exhausted(0, Duration::from_secs(1)));
        assert!(config.is_exhausted(1, Duration::from_secs(1)));
    }
}
