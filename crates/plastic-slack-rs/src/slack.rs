// ABOUTME: Slack client wrapper using the slack-morphism Web API client.
// ABOUTME: Posts messages and threaded replies; implements the ChatSender capability.

use crate::config::SlackConfig;
use crate::error::{RelayError, Result};
use async_trait::async_trait;
use plastic_relay_core::{ChatSender, SendError, ThreadHandle};
use slack_morphism::errors::SlackClientError;
use slack_morphism::prelude::*;
use std::sync::Arc;
use tracing::{debug, info};

/// Slack client wrapper for posting notifications.
pub struct SlackPoster {
    client: Arc<SlackHyperClient>,
    bot_token: SlackApiToken,
    bot_user_id: SlackUserId,
}

impl SlackPoster {
    /// Create a new Slack client and authenticate.
    pub async fn new(config: &SlackConfig) -> Result<Self> {
        info!("Initializing Slack client");

        let connector = SlackClientHyperConnector::new()
            .map_err(|e| RelayError::Slack(format!("Failed to create Slack connector: {}", e)))?;
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        let bot_token_value: SlackApiTokenValue = config.bot_token.clone().into();
        let bot_token = SlackApiToken::new(bot_token_value);

        // Fail at startup rather than on the first notification
        let session = client.open_session(&bot_token);
        let auth_response = session
            .auth_test()
            .await
            .map_err(|e| RelayError::Slack(format!("Auth test failed: {}", e)))?;

        let bot_user_id = auth_response.user_id;
        info!(bot_user_id = %bot_user_id, "Slack authentication successful");

        Ok(Self {
            client,
            bot_token,
            bot_user_id,
        })
    }

    /// Get the bot's user ID.
    pub fn bot_user_id(&self) -> &SlackUserId {
        &self.bot_user_id
    }

    /// Post a message to a Slack channel, optionally in a thread.
    pub async fn post_message(
        &self,
        channel_id: &str,
        text: &str,
        thread_ts: Option<&str>,
    ) -> std::result::Result<SlackTs, SlackClientError> {
        debug!(channel_id = %channel_id, thread_ts = ?thread_ts, "Posting message to Slack");

        let session = self.client.open_session(&self.bot_token);

        let mut request = SlackApiChatPostMessageRequest::new(
            SlackChannelId::new(channel_id.to_string()),
            SlackMessageContent::new().with_text(text.to_string()),
        );

        if let Some(ts) = thread_ts {
            request = request.with_thread_ts(SlackTs::new(ts.to_string()));
        }

        let response = session.chat_post_message(&request).await?;

        debug!(message_ts = %response.ts, "Message posted successfully");
        Ok(response.ts)
    }
}

#[async_trait]
impl ChatSender for SlackPoster {
    async fn send(
        &self,
        text: &str,
        channel: &str,
        thread_parent: Option<&ThreadHandle>,
    ) -> std::result::Result<ThreadHandle, SendError> {
        self.post_message(channel, text, thread_parent.map(ThreadHandle::as_str))
            .await
            .map(|ts| ThreadHandle::new(ts.to_string()))
            .map_err(to_send_error)
    }
}

/// Slack API rejections keep their error code; everything else is transport.
fn to_send_error(err: SlackClientError) -> SendError {
    match err {
        SlackClientError::ApiError(api) => SendError::Api(api.code),
        other => SendError::Transport(other.to_string()),
    }
}
