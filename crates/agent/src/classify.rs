//! Input classification for the dispatch pipeline.
//!
//! Both decisions are plain case-sensitive substring tests. Task kinds are
//! resolved from an ordered trigger table so the priority between them is
//! fixed by the table, not by branch order.

use parley_core::memory::MemoryScope;

/// Marks a message as needing task orchestration.
pub const COMPLEX_TASK_INDICATOR: &str = "complex";

/// Upgrades a memory task to the private scope.
pub const PRIVATE_INDICATOR: &str = "private";

/// Where the dispatcher sends a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Task orchestration (first pass plus reevaluation)
    Task,
    /// Single call to the direct responder
    Direct,
}

impl Route {
    pub fn classify(input: &str) -> Self {
        if input.contains(COMPLEX_TASK_INDICATOR) {
            Route::Task
        } else {
            Route::Direct
        }
    }
}

/// What a single executor pass does with its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Memory lookup in the given scope
    Memory(MemoryScope),
    /// Placeholder action
    Action,
    /// Termination signal
    Stop,
    /// Anything else
    Other,
}

#[derive(Debug, Clone, Copy)]
enum Trigger {
    Memory,
    Action,
    Stop,
}

/// Highest priority first; the first trigger found in the input wins.
const TASK_TRIGGERS: [(&str, Trigger); 3] = [
    ("memory", Trigger::Memory),
    ("action", Trigger::Action),
    ("stop", Trigger::Stop),
];

impl TaskKind {
    pub fn classify(input: &str) -> Self {
        let trigger = TASK_TRIGGERS
            .iter()
            .find(|(needle, _)| input.contains(needle))
            .map(|(_, trigger)| *trigger);

        match trigger {
            Some(Trigger::Memory) if input.contains(PRIVATE_INDICATOR) => {
                TaskKind::Memory(MemoryScope::Private)
            }
            Some(Trigger::Memory) => TaskKind::Memory(MemoryScope::Public),
            Some(Trigger::Action) => TaskKind::Action,
            Some(Trigger::Stop) => TaskKind::Stop,
            None => TaskKind::Other,
        }
    }
}
