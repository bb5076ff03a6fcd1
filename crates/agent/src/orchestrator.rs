//! Task orchestration: a first task pass followed by reevaluation.

use std::sync::Arc;

use tracing::info;

use crate::executor::TaskStep;
use crate::reevaluate::ReevaluationLoop;

/// Drives one complex message through the task pipeline.
///
/// The result is always `first + "\n" + reevaluation`, even when the first
/// pass already produced the stop sentinel.
pub struct TaskOrchestrator {
    step: Arc<dyn TaskStep>,
    reevaluation: ReevaluationLoop,
}

impl TaskOrchestrator {
    pub fn new(step: Arc<dyn TaskStep>, reevaluation: ReevaluationLoop) -> Self {
        Self { step, reevaluation }
    }

    pub async fn run_task(&self, input: &str, user_id: &str) -> String {
        info!(user_id, "Handling complex task");

        let first = self.step.execute_once(input, user_id).await;
        let reevaluated = self.reevaluate(&first, user_id).await;

        format!("{first}\n{reevaluated}")
    }

    /// Run only the reevaluation chain from `seed`.
    pub async fn reevaluate(&self, seed: &str, user_id: &str) -> String {
        self.reevaluation.run(self.step.as_ref(), seed, user_id).await
    }
}
