use crate::classify::MeetingType;
use crate::domain::ids::{MeetingId, OrgId, UserId};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// A meeting inferred from a subject line, resolved case-insensitively by
/// `(user_id, title)`. Type and organization are set at creation and not
/// updated by later mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: MeetingId,
    pub user_id: UserId,
    pub org_id: Option<OrgId>,
    pub title: String,
    pub meeting_type: MeetingType,
    pub created_at: i64,
}

impl Meeting {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.title.trim().is_empty() {
            return Err(CoreError::EmptyMeetingTitle);
        }
        Ok(())
    }
}
