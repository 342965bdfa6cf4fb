//! Error types for conversations and actors.

use crate::completion::CompletionError;
use thiserror::Error;

/// Errors that can occur while running a conversation.
#[derive(Debug, Error)]
pub enum ConversationError {
    /// No completion service was bound before an actor was invoked.
    ///
    /// This is fatal for the run and is never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A caller supplied a value the conversation refuses to store.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The completion service failed. The current round is aborted.
    #[error("Completion service failed: {0}")]
    Service(#[from] CompletionError),

    /// A prompt template failed to render.
    #[error("Template error: {0}")]
    Template(String),

    /// The conversation has already used up its rounds or ended early.
    #[error("Conversation is already complete")]
    AlreadyComplete,

    /// Reading a facilitator comment failed.
    #[error("Moderator error: {0}")]
    Moderator(String),
}

impl ConversationError {
    /// Returns `true` for errors that should halt the whole run.
    ///
    /// Validation errors only reject the offending call; everything else means
    /// the conversation can no longer keep every persona's history in order.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ConversationError::Validation(_))
    }
}

impl From<minijinja::Error> for ConversationError {
    fn from(err: minijinja::Error) -> Self {
        ConversationError::Template(err.to_string())
    }
}

/// Rejects blank text for the named field.
pub(crate) fn require_non_empty(field: &str, value: String) -> Result<String, ConversationError> {
    if value.trim().is_empty() {
        Err(ConversationError::Validation(format!(
            "{field} must not be empty"
        )))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_is_not_fatal() {
        let err = ConversationError::Validation("empty topic".to_string());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_configuration_and_service_are_fatal() {
        assert!(ConversationError::Configuration("no service".to_string()).is_fatal());
        assert!(ConversationError::from(CompletionError::EmptyResponse).is_fatal());
        assert!(ConversationError::AlreadyComplete.is_fatal());
    }

    #[test]
    fn test_service_error_message_wraps_source() {
        let err = ConversationError::from(CompletionError::Request("connection reset".into()));
        assert_eq!(
            err.to_string(),
            "Completion service failed: Request failed: connection reset"
        );
    }
}
