//! Reevaluation loop: chained re-invocation of a task step.
//!
//! Iteration `i` (1-based) feeds `previous + " iteration " + i` to the step,
//! where `previous` is the seed for the first iteration and the prior
//! iteration's output afterwards. Every output is appended to the result
//! followed by a newline. Iterations depend on each other and run strictly
//! in order.

use tracing::{debug, info};

use crate::executor::{TaskStep, STOP_SENTINEL};

/// Number of reevaluation passes when nothing else is configured.
pub const DEFAULT_MAX_REEVALUATIONS: u32 = parley_config::DEFAULT_MAX_REEVALUATIONS;

/// A bounded, sequential reevaluation driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReevaluationLoop {
    max_iterations: u32,
    stop_on_sentinel: bool,
}

impl Default for ReevaluationLoop {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_REEVALUATIONS,
            stop_on_sentinel: false,
        }
    }
}

impl ReevaluationLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `[task]` section of the config.
    pub fn from_config(config: &parley_config::TaskConfig) -> Self {
        Self {
            max_iterations: config.max_reevaluations,
            stop_on_sentinel: config.stop_on_sentinel,
        }
    }

    /// Set the number of passes.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// End the loop after a pass that returns the stop sentinel.
    pub fn with_stop_on_sentinel(mut self, enabled: bool) -> Self {
        self.stop_on_sentinel = enabled;
        self
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// The decorated input for iteration `iteration` (1-based).
    pub fn iteration_input(previous: &str, iteration: u32) -> String {
        format!("{previous} iteration {iteration}")
    }

    /// Run the loop from `seed` and return all outputs, each newline-terminated.
    pub async fn run(&self, step: &dyn TaskStep, seed: &str, user_id: &str) -> String {
        info!(user_id, iterations = self.max_iterations, "Reevaluating and handling more tasks");

        let mut result = String::new();
        let mut current = seed.to_string();

        for i in 1..=self.max_iterations {
            debug!(iteration = i, "Reevaluation iteration");

            let input = Self::iteration_input(&current, i);
            let output = step.execute_once(&input, user_id).await;

            result.push_str(&output);
            result.push('\n');

            if self.stop_on_sentinel && output == STOP_SENTINEL {
                debug!(iteration = i, "Stop sentinel reached, ending reevaluation");
                break;
            }

            current = output;
        }

        result
    }
}
