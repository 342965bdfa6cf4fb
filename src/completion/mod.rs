//! The completion service every actor talks to.
//!
//! A completion service turns an ordered, role-tagged history into a single
//! reply. It keeps no state between calls: the full context is passed each
//! time, so the same service can be shared by every actor in a conversation.
//!
//! # Custom backends
//!
//! ```rust,ignore
//! use async_trait::async_trait;
//! use roundtable::completion::{CompletionError, CompletionService};
//! use roundtable::message::Message;
//!
//! struct EchoCompletion;
//!
//! #[async_trait]
//! impl CompletionService for EchoCompletion {
//!     async fn complete(
//!         &self,
//!         history: &[Message],
//!         _temperature: f32,
//!     ) -> Result<String, CompletionError> {
//!         history
//!             .last()
//!             .map(|m| m.content.clone())
//!             .ok_or(CompletionError::EmptyResponse)
//!     }
//! }
//! ```

#[cfg(feature = "openai-api")]
pub mod openai;

#[cfg(feature = "openai-api")]
pub use openai::OpenAiCompletion;

use crate::message::Message;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by a completion backend.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The request never produced a response (network, timeout, connect).
    #[error("Request failed: {0}")]
    Request(String),

    /// The backend answered with an error status.
    #[error("API error (status {status:?}): {message}")]
    Api {
        status: Option<u16>,
        message: String,
    },

    /// The backend answered but returned no text.
    #[error("Completion service returned no content")]
    EmptyResponse,

    #[error("Completion error: {0}")]
    Other(String),
}

/// A stateless text-completion backend.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Produces the next reply for `history` at the given `temperature`.
    ///
    /// Implementations must preserve message order and role tags.
    async fn complete(&self, history: &[Message], temperature: f32)
    -> Result<String, CompletionError>;

    /// Returns the name of this backend, used in logs.
    fn name(&self) -> String {
        std::any::type_name::<Self>()
            .split("::")
            .last()
            .unwrap_or("UnknownCompletion")
            .to_string()
    }
}

/// A shared completion service handle.
pub type SharedCompletion = Arc<dyn CompletionService>;
