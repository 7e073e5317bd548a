use crate::error::{Result, StoreError};
use dealbrief_core::classify::MeetingType;
use dealbrief_core::domain::{Meeting, MeetingId, OrgId, UserId};
use rusqlite::{params, Connection, Row};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct MeetingNew {
    pub title: String,
    pub meeting_type: MeetingType,
    pub org_id: Option<OrgId>,
}

pub struct MeetingsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> MeetingsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Newest-created meeting with this title for the user, compared
    /// case-insensitively. Id breaks ties between same-second rows.
    pub fn latest_by_title(&self, user_id: UserId, title: &str) -> Result<Option<Meeting>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, org_id, title, meeting_type, created_at
             FROM meetings
             WHERE user_id = ?1 AND title = ?2 COLLATE NOCASE
             ORDER BY created_at DESC, id DESC
             LIMIT 1;",
        )?;
        let mut rows = stmt.query(params![user_id.to_string(), title.trim()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(meeting_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn create(&self, now_utc: i64, user_id: UserId, input: MeetingNew) -> Result<Meeting> {
        let meeting = Meeting {
            id: MeetingId::new(),
            user_id,
            org_id: input.org_id,
            title: input.title.trim().to_string(),
            meeting_type: input.meeting_type,
            created_at: now_utc,
        };
        meeting.validate()?;

        self.conn.execute(
            "INSERT INTO meetings (id, user_id, org_id, title, meeting_type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                meeting.id.to_string(),
                meeting.user_id.to_string(),
                meeting.org_id.map(|id| id.to_string()),
                meeting.title,
                meeting.meeting_type.as_str(),
                meeting.created_at
            ],
        )?;
        Ok(meeting)
    }

    pub fn get(&self, id: MeetingId) -> Result<Option<Meeting>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, org_id, title, meeting_type, created_at
             FROM meetings WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(meeting_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn list_for_user(&self, user_id: UserId) -> Result<Vec<Meeting>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, org_id, title, meeting_type, created_at
             FROM meetings
             WHERE user_id = ?1
             ORDER BY created_at DESC;",
        )?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut meetings = Vec::new();
        while let Some(row) = rows.next()? {
            meetings.push(meeting_from_row(row)?);
        }
        Ok(meetings)
    }

    pub fn created_since(&self, user_id: UserId, since_utc: i64) -> Result<Vec<Meeting>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, org_id, title, meeting_type, created_at
             FROM meetings
             WHERE user_id = ?1 AND created_at >= ?2
             ORDER BY created_at ASC;",
        )?;
        let mut rows = stmt.query(params![user_id.to_string(), since_utc])?;
        let mut meetings = Vec::new();
        while let Some(row) = rows.next()? {
            meetings.push(meeting_from_row(row)?);
        }
        Ok(meetings)
    }
}

fn meeting_from_row(row: &Row<'_>) -> Result<Meeting> {
    let id_str: String = row.get(0)?;
    let id = MeetingId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str))?;
    let user_str: String = row.get(1)?;
    let user_id = UserId::from_str(&user_str).map_err(|_| StoreError::InvalidId(user_str))?;
    let org_str: Option<String> = row.get(2)?;
    let org_id = match org_str {
        Some(raw) => Some(OrgId::from_str(&raw).map_err(|_| StoreError::InvalidId(raw))?),
        None => None,
    };
    let type_str: String = row.get(4)?;
    let meeting_type = MeetingType::from_str(&type_str)?;
    Ok(Meeting {
        id,
        user_id,
        org_id,
        title: row.get(3)?,
        meeting_type,
        created_at: row.get(5)?,
    })
}
