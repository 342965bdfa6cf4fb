#![allow(dead_code)]

use async_trait::async_trait;
use roundtable::{Actor, CompletionError, CompletionService, Message};
use std::sync::{Arc, Mutex};

/// Replies from a fixed script (cycling) and records every history it sees.
#[derive(Clone)]
pub struct ScriptedCompletion {
    replies: Vec<String>,
    seen: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl ScriptedCompletion {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: replies.iter().map(|r| r.to_string()).collect(),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn seen(&self) -> Vec<Vec<Message>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(
        &self,
        history: &[Message],
        _temperature: f32,
    ) -> Result<String, CompletionError> {
        let mut seen = self.seen.lock().unwrap();
        let reply = self.replies[seen.len() % self.replies.len()].clone();
        seen.push(history.to_vec());
        Ok(reply)
    }
}

/// Always fails, as a dropped connection would.
pub struct FailingCompletion;

#[async_trait]
impl CompletionService for FailingCompletion {
    async fn complete(&self, _: &[Message], _: f32) -> Result<String, CompletionError> {
        Err(CompletionError::Request("connection reset by peer".to_string()))
    }
}

/// Builds an actor wired to its own scripted completion.
pub fn scripted_actor(first_name: &str, replies: &[&str]) -> (Actor, ScriptedCompletion) {
    let completion = ScriptedCompletion::new(replies);
    let actor = Actor::new(
        first_name,
        "Tester",
        "Participant",
        format!("You are {first_name}."),
    )
    .with_completion(Arc::new(completion.clone()));
    (actor, completion)
}
