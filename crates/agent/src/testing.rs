//! Shared test doubles for the dispatch pipeline.

use async_trait::async_trait;
use parley_core::error::RemoteServiceError;
use parley_core::memory::MemoryStore;
use parley_core::responder::Responder;
use std::sync::Mutex;

use crate::executor::TaskStep;

/// A responder that answers from a fixed script and counts calls.
///
/// Panics if more calls are made than replies provided.
pub struct ScriptedResponder {
    replies: Mutex<Vec<Result<String, RemoteServiceError>>>,
    inputs: Mutex<Vec<String>>,
}

impl ScriptedResponder {
    pub fn new(replies: Vec<Result<String, RemoteServiceError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().rev().collect()),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn failing(message: &str) -> Self {
        Self::new(vec![Err(RemoteServiceError::new(message))])
    }

    /// A responder that must never be called.
    pub fn silent() -> Self {
        Self::new(Vec::new())
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.inputs.lock().unwrap().len()
    }
}

#[async_trait]
impl Responder for ScriptedResponder {
    async fn respond(&self, input: &str) -> Result<String, RemoteServiceError> {
        self.inputs.lock().unwrap().push(input.to_string());
        let next = self.replies.lock().unwrap().pop();
        match next {
            Some(reply) => reply,
            None => panic!("ScriptedResponder: no more replies for {input:?}"),
        }
    }
}

/// `(scope, user id for private lookups, input)`
pub type Lookup = (String, Option<String>, String);

/// A memory store that answers with a fixed text and records lookups.
pub struct RecordingMemory {
    answer: String,
    lookups: Mutex<Vec<Lookup>>,
}

impl RecordingMemory {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn lookups(&self) -> Vec<Lookup> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl MemoryStore for RecordingMemory {
    fn name(&self) -> &str {
        "recording"
    }

    async fn retrieve_public_memory(&self, input: &str) -> String {
        self.lookups
            .lock()
            .unwrap()
            .push(("public".into(), None, input.to_string()));
        self.answer.clone()
    }

    async fn retrieve_private_memory(&self, user_id: &str, input: &str) -> String {
        self.lookups.lock().unwrap().push((
            "private".into(),
            Some(user_id.to_string()),
            input.to_string(),
        ));
        self.answer.clone()
    }
}

type StepFn = Box<dyn Fn(&str) -> String + Send + Sync>;

/// A task step driven by a closure that records every call.
pub struct RecordingStep {
    respond: StepFn,
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingStep {
    pub fn new(respond: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A step that returns its input unchanged.
    pub fn echo() -> Self {
        Self::new(|input| input.to_string())
    }

    pub fn inputs(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(i, _)| i.clone()).collect()
    }

    pub fn user_ids(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(_, u)| u.clone()).collect()
    }
}

#[async_trait]
impl TaskStep for RecordingStep {
    async fn execute_once(&self, input: &str, user_id: &str) -> String {
        self.calls
            .lock()
            .unwrap()
            .push((input.to_string(), user_id.to_string()));
        (self.respond)(input)
    }
}
