use crate::domain::ids::{MeetingId, MessageId, UserId};
use serde::{Deserialize, Serialize};

/// One ingested email, the append-only ledger row. Uniquely identified by
/// `(user_id, message_id)`; a second delivery of the same message id is a
/// no-op, and rows are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub id: MessageId,
    pub user_id: UserId,
    pub message_id: String,
    pub thread_id: Option<String>,
    pub from_address: String,
    pub from_name: Option<String>,
    pub to_addresses: Vec<String>,
    pub cc_addresses: Vec<String>,
    pub subject: String,
    pub text_body: Option<String>,
    pub html_body: Option<String>,
    pub meeting_id: Option<MeetingId>,
    pub deal_id: Option<String>,
    pub sent_at: i64,
    pub created_at: i64,
}
