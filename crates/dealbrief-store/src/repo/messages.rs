use crate::error::{Result, StoreError};
use dealbrief_core::domain::{EmailMessage, MeetingId, MessageId, UserId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct MessageNew {
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
}

pub struct MessagesRepo<'a> {
    conn: &'a Connection,
}

impl<'a> MessagesRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Appends one ledger row. Returns `false` when `(user_id, message_id)`
    /// already exists: webhook retries must be a no-op, not an error.
    pub fn record(&self, now_utc: i64, user_id: UserId, input: &MessageNew) -> Result<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO email_messages
             (id, user_id, message_id, thread_id, from_address, from_name,
              to_addresses, cc_addresses, subject, text_body, html_body,
              meeting_id, deal_id, sent_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15);",
            params![
                MessageId::new().to_string(),
                user_id.to_string(),
                input.message_id,
                input.thread_id,
                input.from_address,
                input.from_name,
                join_addresses(&input.to_addresses),
                join_addresses(&input.cc_addresses),
                input.subject,
                input.text_body,
                input.html_body,
                input.meeting_id.map(|id| id.to_string()),
                input.deal_id,
                input.sent_at,
                now_utc
            ],
        )?;
        Ok(inserted > 0)
    }

    pub fn find_by_message_id(
        &self,
        user_id: UserId,
        message_id: &str,
    ) -> Result<Option<EmailMessage>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, message_id, thread_id, from_address, from_name,
                    to_addresses, cc_addresses, subject, text_body, html_body,
                    meeting_id, deal_id, sent_at, created_at
             FROM email_messages
             WHERE user_id = ?1 AND message_id = ?2;",
        )?;
        let mut rows = stmt.query(params![user_id.to_string(), message_id])?;
        if let Some(row) = rows.next()? {
            Ok(Some(message_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn count_for_user(&self, user_id: UserId) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(1) FROM email_messages WHERE user_id = ?1;",
            [user_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn count_since(&self, user_id: UserId, since_utc: i64) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(1) FROM email_messages WHERE user_id = ?1 AND sent_at >= ?2;",
            params![user_id.to_string(), since_utc],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn latest_sent_at(&self, user_id: UserId) -> Result<Option<i64>> {
        let ts: Option<i64> = self
            .conn
            .query_row(
                "SELECT sent_at FROM email_messages
                 WHERE user_id = ?1
                 ORDER BY sent_at DESC
                 LIMIT 1;",
                [user_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(ts)
    }
}

fn join_addresses(addresses: &[String]) -> String {
    addresses.join(",")
}

fn split_addresses(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn message_from_row(row: &Row<'_>) -> Result<EmailMessage> {
    let id_str: String = row.get(0)?;
    let id = MessageId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str))?;
    let user_str: String = row.get(1)?;
    let user_id = UserId::from_str(&user_str).map_err(|_| StoreError::InvalidId(user_str))?;
    let meeting_str: Option<String> = row.get(11)?;
    let meeting_id = match meeting_str {
        Some(raw) => Some(MeetingId::from_str(&raw).map_err(|_| StoreError::InvalidId(raw))?),
        None => None,
    };
    let to_raw: String = row.get(6)?;
    let cc_raw: String = row.get(7)?;
    Ok(EmailMessage {
        id,
        user_id,
        message_id: row.get(2)?,
        thread_id: row.get(3)?,
        from_address: row.get(4)?,
        from_name: row.get(5)?,
        to_addresses: split_addresses(&to_raw),
        cc_addresses: split_addresses(&cc_raw),
        subject: row.get(8)?,
        text_body: row.get(9)?,
        html_body: row.get(10)?,
        meeting_id,
        deal_id: row.get(12)?,
        sent_at: row.get(13)?,
        created_at: row.get(14)?,
    })
}
