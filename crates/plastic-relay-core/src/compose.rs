// ABOUTME: Renders the summary message and one message per action group.
// ABOUTME: Uses Slack mrkdwn bold headers and folder/document glyphs.

use crate::change::ActionCode;
use crate::group::GroupEntry;
use std::fmt::Write;

/// Line closing every group message.
pub const SEPARATOR: &str = "✄┈┈┈┈┈┈┈┈┈┈┈┈┈";

pub const UNKNOWN_AUTHOR: &str = "Unknown";
pub const NO_CONTENT: &str = "No content provided";

/// Render one action group. Never splits or truncates.
pub fn compose(action: &ActionCode, entries: &[GroupEntry]) -> String {
    let label = action.label().unwrap_or("Unknown");
    let mut message = format!("*Files {label}*\n");

    for entry in entries {
        let _ = writeln!(message, "{} {}", entry.object_type.glyph(), entry.path);
    }

    message.push_str(SEPARATOR);
    message.push_str("\n\n");
    message
}

/// Render the thread-parent message. Empty values count as absent.
pub fn compose_summary(author: Option<&str>, machine: Option<&str>, content: Option<&str>) -> String {
    let author = non_empty(author).unwrap_or(UNKNOWN_AUTHOR);
    let machine = non_empty(machine).unwrap_or(UNKNOWN_AUTHOR);
    let content = non_empty(content).unwrap_or(NO_CONTENT);

    format!("\n*Author*: {author}/{machine}\n\n{content}\n")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
