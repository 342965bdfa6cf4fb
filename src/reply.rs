//! Classification of actor replies into contributions, passes and done signals.
//!
//! Completion services only ever return free text, so the control markers are
//! detected by substring search. `Reply` is the typed result of that search.

use serde::{Deserialize, Serialize};

/// Marker an actor emits to decline speaking this turn.
pub const PASS_MARKER: &str = "*Pass*";

/// Marker an actor emits to end the discussion early.
pub const DONE_MARKER: &str = "*Done*";

/// The sentinel an actor returns in place of a suppressed pass reply.
pub fn pass_sentinel(first_name: &str) -> String {
    format!("{}: {}", first_name, PASS_MARKER)
}

/// A classified reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Reply {
    /// A genuine contribution to broadcast to the other actors.
    Contribution(String),
    /// The actor declined to speak.
    Pass,
    /// The actor asked to end the discussion. Carries the raw text.
    Done(String),
}

impl Reply {
    /// Scans `text` for control markers. A done marker wins over a pass marker.
    pub fn classify(text: &str) -> Self {
        if text.contains(DONE_MARKER) {
            Reply::Done(text.to_string())
        } else if text.contains(PASS_MARKER) {
            Reply::Pass
        } else {
            Reply::Contribution(text.to_string())
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Reply::Done(_))
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Reply::Pass)
    }
}
