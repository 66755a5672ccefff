// ABOUTME: Error types for plastic-relay-core.
// ABOUTME: ParseError for malformed change entries, SendError for chat capability failures.

use thiserror::Error;

/// A raw change entry that does not match `ACTION "PATH" TYPE#METADATA`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Could not parse change entry: {line}")]
pub struct ParseError {
    pub line: String,
}

/// Failure reported by a [`ChatSender`](crate::ChatSender).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    #[error("Chat API error: {0}")]
    Api(String),

    #[error("Chat transport error: {0}")]
    Transport(String),

    #[error("Message too large: {len} chars exceeds limit of {limit}")]
    TooLarge { len: usize, limit: usize },
}
