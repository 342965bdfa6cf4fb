//! Configuration for a conversation.

use serde::{Deserialize, Serialize};

/// What a `*Done*` signal ends.
///
/// Has no default; every conversation states its choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonePolicy {
    /// Stop visiting actors for the current round only. Later rounds still run.
    EndRound,
    /// Stop the current round and mark the whole conversation complete.
    EndConversation,
}

/// Configuration for a conversation.
///
/// # Examples
///
/// ```
/// use roundtable::config::{ConversationConfig, DonePolicy};
///
/// let config = ConversationConfig::new(6, DonePolicy::EndConversation)
///     .with_behavior("Keep replies under three sentences.")
///     .with_company("Acme Corp designs consumer drones.");
///
/// assert_eq!(config.rounds, 6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Maximum number of rounds `discuss_topic` runs.
    pub rounds: usize,

    /// How a done signal is handled.
    pub done_policy: DonePolicy,

    /// Behavior text stamped onto every actor that joins.
    ///
    /// **Default:** `None` (rendered as empty text in the system message)
    #[serde(default)]
    pub behavior: Option<String>,

    /// Company text stamped onto every actor that joins.
    ///
    /// **Default:** `None`
    #[serde(default)]
    pub company: Option<String>,

    /// Topic used before `discuss_topic` sets one.
    #[serde(default = "default_topic")]
    pub topic: String,
}

pub(crate) fn default_topic() -> String {
    "Discuss whatever you like.".to_string()
}

impl ConversationConfig {
    pub fn new(rounds: usize, done_policy: DonePolicy) -> Self {
        Self {
            rounds,
            done_policy,
            behavior: None,
            company: None,
            topic: default_topic(),
        }
    }

    pub fn with_behavior(mut self, behavior: impl Into<String>) -> Self {
        self.behavior = Some(behavior.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }
}
