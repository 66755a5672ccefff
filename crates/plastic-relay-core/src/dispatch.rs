// ABOUTME: Notification dispatcher: summary message first, then one threaded reply per action group.
// ABOUTME: Group sends run concurrently; their failures are collected as warnings.

use crate::change::{parse_entries, ActionCode};
use crate::compose::{compose, compose_summary};
use crate::error::SendError;
use crate::group::group;
use crate::sender::{ChatSender, ThreadHandle};
use futures::future::join_all;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Reason reported when the thread-parent message could not be posted.
pub const SUMMARY_SEND_FAILED: &str = "summary send failed";

/// Slack rejects `chat.postMessage` text above this many characters.
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 40_000;

/// One inbound change-list notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationRequest {
    pub author: Option<String>,
    pub machine: Option<String>,
    pub content: Option<String>,
    pub raw_change_entries: Vec<String>,
}

/// Dispatcher settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Group messages longer than this are reported instead of sent.
    pub max_message_chars: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
        }
    }
}

/// A group message that could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupWarning {
    pub action: ActionCode,
    pub error: SendError,
}

impl fmt::Display for GroupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} group not sent: {}", self.action, self.error)
    }
}

/// Result of dispatching one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The summary was posted. Group failures, if any, are listed.
    Succeeded { warnings: Vec<GroupWarning> },
    /// The summary could not be posted; nothing else was sent.
    Failed { reason: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded { .. })
    }

    pub fn warnings(&self) -> &[GroupWarning] {
        match self {
            Outcome::Succeeded { warnings } => warnings,
            Outcome::Failed { .. } => &[],
        }
    }
}

/// Sends notifications through a [`ChatSender`].
#[derive(Clone)]
pub struct Dispatcher {
    sender: Arc<dyn ChatSender>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(sender: Arc<dyn ChatSender>, config: DispatchConfig) -> Self {
        Self { sender, config }
    }

    /// Post the summary to `channel`, then every recognized action group as a
    /// reply in its thread, in `AD, CH, DE, RE, MV` order.
    pub async fn dispatch(&self, request: &NotificationRequest, channel: &str) -> Outcome {
        let summary = compose_summary(
            request.author.as_deref(),
            request.machine.as_deref(),
            request.content.as_deref(),
        );

        let thread = match self.sender.send(&summary, channel, None).await {
            Ok(handle) => handle,
            Err(e) => {
                error!(channel = %channel, error = %e, "Failed to send summary message");
                return Outcome::Failed {
                    reason: SUMMARY_SEND_FAILED.to_string(),
                };
            }
        };
        debug!(channel = %channel, thread = %thread, "Summary message sent");

        let grouped = group(parse_entries(&request.raw_change_entries));

        let sends = grouped.recognized().map(|(action, entries)| {
            let thread = &thread;
            async move {
                let text = compose(action, entries);
                let result = self.send_group(&text, channel, thread).await;
                (action.clone(), result)
            }
        });
        let results = join_all(sends).await;
        let groups_sent = results.len();

        let warnings: Vec<GroupWarning> = results
            .into_iter()
            .filter_map(|(action, result)| {
                result.err().map(|error| GroupWarning { action, error })
            })
            .collect();

        for warning in &warnings {
            warn!(channel = %channel, thread = %thread, "{warning}");
        }
        info!(
            channel = %channel,
            groups = groups_sent,
            failed = warnings.len(),
            "Notification dispatched"
        );

        Outcome::Succeeded { warnings }
    }

    async fn send_group(
        &self,
        text: &str,
        channel: &str,
        thread: &ThreadHandle,
    ) -> Result<ThreadHandle, SendError> {
        let len = text.chars().count();
        if len > self.config.max_message_chars {
            return Err(SendError::TooLarge {
                len,
                limit: self.config.max_message_chars,
            });
        }
        self.sender.send(text, channel, Some(thread)).await
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_config_default() {
        assert_eq!(DispatchConfig::default().max_message_chars, 40_000);
    }

    #[test]
    fn test_outcome_warnings() {
        let failed = Outcome::Failed {
            reason: SUMMARY_SEND_FAILED.to_string(),
        };
        assert!(!failed.is_success());
        assert!(failed.warnings().is_empty());

        let ok = Outcome::Succeeded {
            warnings: vec![GroupWarning {
                action: ActionCode::Deleted,
                error: SendError::Api("channel_not_found".to_string()),
            }],
        };
        assert!(ok.is_success());
        assert_eq!(ok.warnings().len(), 1);
        assert_eq!(
            ok.warnings()[0].to_string(),
            "DE group not sent: Chat API error: channel_not_found"
        );
    }
}
