//! Task executor: one classification-and-respond pass over a text input.

use std::sync::Arc;

use async_trait::async_trait;
use parley_core::memory::MemoryStore;
use tracing::{debug, info};

use crate::classify::TaskKind;

/// Returned when a pass sees the termination trigger.
pub const STOP_SENTINEL: &str = "No further tasks to handle.";

/// Prefix of the placeholder action result.
pub const ACTION_PREFIX: &str = "Performed action: ";

/// Prefix of the fallback result.
pub const OTHER_TASK_PREFIX: &str = "Handled other task for input: ";

/// One unit of task work.
///
/// Implementations are total: every input yields some text.
#[async_trait]
pub trait TaskStep: Send + Sync {
    async fn execute_once(&self, input: &str, user_id: &str) -> String;
}

/// The production task step, backed by a memory store.
pub struct TaskExecutor {
    memory: Arc<dyn MemoryStore>,
}

impl TaskExecutor {
    pub fn new(memory: Arc<dyn MemoryStore>) -> Self {
        Self { memory }
    }

    fn perform_action(action: &str) -> String {
        info!("Performing action: {action}");
        format!("{ACTION_PREFIX}{action}")
    }
}

#[async_trait]
impl TaskStep for TaskExecutor {
    async fn execute_once(&self, input: &str, user_id: &str) -> String {
        let kind = TaskKind::classify(input);
        debug!(user_id, ?kind, "Handling task iteration");

        match kind {
            TaskKind::Memory(scope) => {
                info!(user_id, ?scope, store = self.memory.name(), "Handling memory task");
                self.memory.retrieve(scope, user_id, input).await
            }
            TaskKind::Action => Self::perform_action(input),
            TaskKind::Stop => STOP_SENTINEL.to_string(),
            TaskKind::Other => format!("{OTHER_TASK_PREFIX}{input}"),
        }
    }
}
