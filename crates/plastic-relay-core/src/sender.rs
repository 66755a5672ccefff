// ABOUTME: ChatSender trait describing the chat capability the dispatcher depends on.
// ABOUTME: ThreadHandle is the opaque id of a sent message used to anchor replies.

use crate::error::SendError;
use async_trait::async_trait;
use std::fmt;

/// Opaque reference to a previously sent message (a Slack `ts`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThreadHandle(String);

impl ThreadHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sends text to a channel, optionally as a threaded reply.
#[async_trait]
pub trait ChatSender: Send + Sync {
    /// Post `text` to `channel`. With `thread_parent`, the message is posted as
    /// a reply under that message. Returns the new message's handle.
    async fn send(
        &self,
        text: &str,
        channel: &str,
        thread_parent: Option<&ThreadHandle>,
    ) -> Result<ThreadHandle, SendError>;
}
