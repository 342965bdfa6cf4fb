//! Human facilitation between rounds.
//!
//! After every actor has spoken, a [`Moderator`] may inject a comment that is
//! broadcast to the whole group. Returning `None` means "no comment".

use crate::error::ConversationError;
use async_trait::async_trait;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};

/// A source of facilitator comments.
#[async_trait]
pub trait Moderator: Send {
    /// Returns the comment for the round that just finished, if any.
    async fn comment(&mut self, round: usize) -> Result<Option<String>, ConversationError>;
}

/// Normalises raw facilitator input: blank text and "pass" mean no comment.
pub fn interpret_comment(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("pass") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Reads one line per round from an async reader, prompting on a writer.
///
/// End of input is treated as "no comment", not as an error.
pub struct ConsoleModerator<R, W> {
    reader: R,
    writer: W,
}

impl ConsoleModerator<BufReader<Stdin>, Stdout> {
    /// A moderator that prompts on stdout and reads stdin.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> ConsoleModerator<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

#[async_trait]
impl<R, W> Moderator for ConsoleModerator<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn comment(&mut self, round: usize) -> Result<Option<String>, ConversationError> {
        let prompt = format!("Moderator comment after round {round} (blank or 'pass' to skip): ");
        self.writer
            .write_all(prompt.as_bytes())
            .await
            .map_err(|e| ConversationError::Moderator(e.to_string()))?;
        self.writer
            .flush()
            .await
            .map_err(|e| ConversationError::Moderator(e.to_string()))?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .await
            .map_err(|e| ConversationError::Moderator(e.to_string()))?;

        if read == 0 {
            return Ok(None);
        }
        Ok(interpret_comment(&line))
    }
}
