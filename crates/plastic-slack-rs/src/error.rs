// ABOUTME: Error types for plastic-slack-rs.
// ABOUTME: Defines RelayError enum covering Slack and Config failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Slack API error: {0}")]
    Slack(String),
}

pub type Result<T> = std::result::Result<T, RelayError>;
