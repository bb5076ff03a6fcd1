//! The message dispatcher: entry point of the pipeline.
//!
//! Every message is routed exactly one way: messages containing the
//! complex-task indicator go through the [`TaskOrchestrator`], everything
//! else is answered by the [`Responder`] in a single call.

use std::sync::Arc;

use parley_core::channel::ChannelMessage;
use parley_core::error::{DispatchError, Result};
use parley_core::memory::MemoryStore;
use parley_core::responder::Responder;
use tracing::{debug, info, warn};

use crate::classify::Route;
use crate::executor::TaskExecutor;
use crate::orchestrator::TaskOrchestrator;
use crate::reevaluate::ReevaluationLoop;

pub struct Dispatcher {
    orchestrator: TaskOrchestrator,
    responder: Arc<dyn Responder>,
}

impl Dispatcher {
    pub fn new(orchestrator: TaskOrchestrator, responder: Arc<dyn Responder>) -> Self {
        Self {
            orchestrator,
            responder,
        }
    }

    /// Wire the production pipeline around a responder and a memory store.
    pub fn from_config(
        config: &parley_config::AppConfig,
        responder: Arc<dyn Responder>,
        memory: Arc<dyn MemoryStore>,
    ) -> Self {
        let executor = Arc::new(TaskExecutor::new(memory));
        let reevaluation = ReevaluationLoop::from_config(&config.task);
        Self::new(TaskOrchestrator::new(executor, reevaluation), responder)
    }

    /// Route one message and return the reply text.
    ///
    /// `None` for either argument is rejected before any routing happens.
    /// An empty string is a valid input.
    pub async fn handle(&self, input: Option<&str>, user_id: Option<&str>) -> Result<String> {
        let (Some(input), Some(user_id)) = (input, user_id) else {
            warn!("Rejected message with missing input or user id");
            return Err(DispatchError::InvalidArgument(
                "Input and userId cannot be absent".into(),
            ));
        };

        info!(user_id, "Handling message");

        match Route::classify(input) {
            Route::Task => Ok(self.orchestrator.run_task(input, user_id).await),
            Route::Direct => {
                debug!("Routing to direct responder");
                Ok(self.responder.respond(input).await?)
            }
        }
    }

    /// Route a message received from a channel.
    pub async fn dispatch(&self, message: &ChannelMessage) -> Result<String> {
        self.handle(Some(message.content.as_str()), Some(message.sender_id.as_str()))
            .await
    }
}
