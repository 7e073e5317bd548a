use crate::domain::ids::UserId;
use serde::{Deserialize, Serialize};

/// A tenant. The `bcc_address` is the only key by which inbound mail is
/// attributed to a user and is immutable once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Option<String>,
    pub bcc_address: String,
    pub created_at: i64,
}
