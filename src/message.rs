//! Role-tagged messages and the append-only history each actor keeps.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who a message is attributed to when it is sent to the completion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Framing instructions (behavior, company, persona).
    System,
    /// Anything the actor hears: the topic, other actors, the moderator.
    Human,
    /// What the actor itself said.
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::Human => "human",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single immutable entry in a [`MessageHistory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self::new(Role::Human, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Formats this entry for display in logs and transcripts.
    pub fn format(&self) -> String {
        format!("[{}]: {}", self.role, self.content)
    }
}

/// An ordered, append-only log of messages.
///
/// Entries can be added and read but never removed or edited, so the context
/// handed to the completion service only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageHistory {
    messages: Vec<Message>,
}

impl MessageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Places `message` at the front. Only used for the system framing, which
    /// must precede everything the actor hears.
    pub(crate) fn push_front(&mut self, message: Message) {
        self.messages.insert(0, message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn first(&self) -> Option<&Message> {
        self.messages.first()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The entry just before the last one, if there are at least two.
    pub fn second_to_last(&self) -> Option<&Message> {
        let len = self.messages.len();
        if len < 2 {
            None
        } else {
            self.messages.get(len - 2)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    /// Number of entries with the given role.
    pub fn count_role(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }
}
