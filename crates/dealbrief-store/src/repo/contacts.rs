use crate::error::{Result, StoreError};
use dealbrief_core::domain::{normalize_email, Contact, ContactId, OrgId, UserId};
use dealbrief_core::CoreError;
use rusqlite::{params, Connection, Row};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ContactNew {
    pub email: String,
    pub name: Option<String>,
    pub org_id: Option<OrgId>,
}

pub struct ContactsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> ContactsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn find_by_email(&self, user_id: UserId, email: &str) -> Result<Option<Contact>> {
        let Some(email) = normalize_email(email) else {
            return Ok(None);
        };
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, org_id, email, name, created_at, updated_at
             FROM contacts
             WHERE user_id = ?1 AND email = ?2;",
        )?;
        let mut rows = stmt.query(params![user_id.to_string(), email])?;
        if let Some(row) = rows.next()? {
            Ok(Some(contact_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    /// Creates a contact for `(user_id, email)`. On a concurrent-create
    /// conflict the existing row is re-read and returned unchanged;
    /// `org_id` linkage is first-write-wins.
    pub fn create(&self, now_utc: i64, user_id: UserId, input: ContactNew) -> Result<Contact> {
        let email = normalize_email(&input.email).ok_or(CoreError::EmptyEmail)?;
        let name = input
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        let contact = Contact {
            id: ContactId::new(),
            user_id,
            org_id: input.org_id,
            email: email.clone(),
            name,
            created_at: now_utc,
            updated_at: now_utc,
        };
        contact.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO contacts (id, user_id, org_id, email, name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT (user_id, email) DO NOTHING;",
            params![
                contact.id.to_string(),
                contact.user_id.to_string(),
                contact.org_id.map(|id| id.to_string()),
                contact.email,
                contact.name,
                contact.created_at,
                contact.updated_at
            ],
        )?;
        if inserted == 0 {
            return self
                .find_by_email(user_id, &email)?
                .ok_or_else(|| StoreError::NotFound(format!("contact {email}")));
        }
        Ok(contact)
    }

    /// Single-field patch: sets the name only when the stored name is
    /// still null. An already-named contact is never overwritten.
    pub fn backfill_name(&self, now_utc: i64, id: ContactId, name: &str) -> Result<bool> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }
        let updated = self.conn.execute(
            "UPDATE contacts
             SET name = ?2, updated_at = ?3
             WHERE id = ?1 AND name IS NULL;",
            params![id.to_string(), trimmed, now_utc],
        )?;
        Ok(updated > 0)
    }

    pub fn get(&self, id: ContactId) -> Result<Option<Contact>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, org_id, email, name, created_at, updated_at
             FROM contacts WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(contact_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn list_for_user(&self, user_id: UserId) -> Result<Vec<Contact>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, org_id, email, name, created_at, updated_at
             FROM contacts
             WHERE user_id = ?1
             ORDER BY email COLLATE NOCASE ASC;",
        )?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(contact_from_row(row)?);
        }
        Ok(contacts)
    }

    pub fn created_since(&self, user_id: UserId, since_utc: i64) -> Result<Vec<Contact>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, org_id, email, name, created_at, updated_at
             FROM contacts
             WHERE user_id = ?1 AND created_at >= ?2
             ORDER BY created_at ASC;",
        )?;
        let mut rows = stmt.query(params![user_id.to_string(), since_utc])?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(contact_from_row(row)?);
        }
        Ok(contacts)
    }
}

fn contact_from_row(row: &Row<'_>) -> Result<Contact> {
    let id_str: String = row.get(0)?;
    let id = ContactId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str))?;
    let user_str: String = row.get(1)?;
    let user_id = UserId::from_str(&user_str).map_err(|_| StoreError::InvalidId(user_str))?;
    let org_str: Option<String> = row.get(2)?;
    let org_id = match org_str {
        Some(raw) => Some(OrgId::from_str(&raw).map_err(|_| StoreError::InvalidId(raw))?),
        None => None,
    };
    Ok(Contact {
        id,
        user_id,
        org_id,
        email: row.get(3)?,
        name: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
