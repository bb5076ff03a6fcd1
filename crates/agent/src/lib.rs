//! The Parley dispatch pipeline.
//!
//! A message enters through the [`Dispatcher`]:
//!
//! 1. **Route**: input containing `"complex"` goes to task orchestration,
//!    anything else goes to the direct [`Responder`](parley_core::Responder)
//! 2. **Execute**: the [`TaskExecutor`] classifies the input (memory,
//!    action, stop, other) and produces one text result
//! 3. **Reevaluate**: the [`ReevaluationLoop`] feeds each result back into
//!    the executor for a fixed number of chained passes
//!
//! The orchestrated reply is the first result followed by every
//! reevaluation result, one per line.

pub mod classify;
pub mod dispatcher;
pub mod executor;
pub mod orchestrator;
pub mod reevaluate;

#[cfg(test)]
mod testing;

pub use classify::{Route, TaskKind, COMPLEX_TASK_INDICATOR, PRIVATE_INDICATOR};
pub use dispatcher::Dispatcher;
pub use executor::{TaskExecutor, TaskStep, ACTION_PREFIX, OTHER_TASK_PREFIX, STOP_SENTINEL};
pub use orchestrator::TaskOrchestrator;
pub use reevaluate::{ReevaluationLoop, DEFAULT_MAX_REEVALUATIONS};
