//! 'roundtable' - Turn-based discussions between LLM-backed personas.
//!
//! A set of independent actors, each with a persona and a private message
//! history, take turns responding to a shared topic and to each other over a
//! bounded number of rounds. The crate owns the turn-taking protocol: random
//! speaking order per round, classification of each reply as a contribution,
//! a pass or a done signal, and broadcast of contributions to everyone except
//! the speaker. Text generation is delegated to a [`CompletionService`].
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use roundtable::{Actor, Conversation, ConversationConfig, DonePolicy};
//!
//! let completion = Arc::new(MyCompletion::new());
//! let mut conversation = Conversation::new(ConversationConfig::new(4, DonePolicy::EndRound))?
//!     .with_completion(completion);
//!
//! conversation.add_stakeholder(Actor::new("Ann", "Lee", "CTO", "You are Ann, a pragmatic CTO."))?;
//! conversation.add_stakeholder(Actor::new("Raj", "Patel", "Designer", "You are Raj, a UX lead."))?;
//!
//! for round in conversation.discuss_topic("How do we onboard new users?").await? {
//!     println!("round {} had {} turns", round.round, round.turns.len());
//! }
//! ```

pub mod actor;
pub mod completion;
pub mod config;
pub mod conversation;
pub mod error;
pub mod message;
pub mod moderator;
pub mod observability;
pub mod prompt_templates;
pub mod reply;

pub use actor::{Actor, ActorId, PersonaProfile};
pub use completion::{CompletionError, CompletionService, SharedCompletion};
pub use config::{ConversationConfig, DonePolicy};
pub use conversation::{Conversation, ConversationState, RoundOutcome, Turn};
pub use error::ConversationError;
pub use message::{Message, MessageHistory, Role};
pub use moderator::{ConsoleModerator, Moderator};
pub use reply::{DONE_MARKER, PASS_MARKER, Reply};

#[cfg(feature = "openai-api")]
pub use completion::OpenAiCompletion;
