use crate::domain::ids::{ContactId, OrgId, UserId};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// A person seen in a user's inbound mail, keyed by `(user_id, email)`.
/// `org_id` is `None` for personal-webmail senders and first-write-wins
/// afterwards; `name` is backfilled once and never overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub user_id: UserId,
    pub org_id: Option<OrgId>,
    pub email: String,
    pub name: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Contact {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.email.trim().is_empty() {
            return Err(CoreError::EmptyEmail);
        }
        Ok(())
    }
}
