// ABOUTME: Library root for plastic-relay-core.
// ABOUTME: Exports change parsing, grouping, composition, the ChatSender trait and the dispatcher.

pub mod change;
pub mod compose;
pub mod dispatch;
pub mod error;
pub mod group;
pub mod sender;

pub use change::{parse_entries, ActionCode, ChangeRecord, ObjectType};
pub use compose::{compose, compose_summary};
pub use dispatch::{
    DispatchConfig, Dispatcher, GroupWarning, NotificationRequest, Outcome, SUMMARY_SEND_FAILED,
};
pub use error::{ParseError, SendError};
pub use group::{group, GroupEntry, GroupedChanges};
pub use sender::{ChatSender, ThreadHandle};
