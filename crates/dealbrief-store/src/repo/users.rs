use crate::error::{Result, StoreError};
use dealbrief_core::domain::{is_routing_address, normalize_email, User, UserId};
use dealbrief_core::CoreError;
use rusqlite::{params, Connection, Row};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct UserNew {
    pub email: Option<String>,
    pub bcc_address: String,
}

pub struct UsersRepo<'a> {
    conn: &'a Connection,
}

impl<'a> UsersRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, now_utc: i64, input: UserNew) -> Result<User> {
        let bcc_address = normalize_email(&input.bcc_address)
            .ok_or_else(|| CoreError::InvalidRoutingAddress(input.bcc_address.clone()))?;
        if !is_routing_address(&bcc_address) {
            return Err(CoreError::InvalidRoutingAddress(bcc_address).into());
        }

        let user = User {
            id: UserId::new(),
            email: input.email.as_deref().and_then(normalize_email),
            bcc_address,
            created_at: now_utc,
        };
        self.conn.execute(
            "INSERT INTO users (id, email, bcc_address, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                user.id.to_string(),
                user.email,
                user.bcc_address,
                user.created_at
            ],
        )?;
        Ok(user)
    }

    pub fn get(&self, id: UserId) -> Result<Option<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, bcc_address, created_at
             FROM users WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(user_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn find_by_bcc_address(&self, address: &str) -> Result<Option<User>> {
        let Some(address) = normalize_email(address) else {
            return Ok(None);
        };
        let mut stmt = self.conn.prepare(
            "SELECT id, email, bcc_address, created_at
             FROM users WHERE bcc_address = ?1;",
        )?;
        let mut rows = stmt.query([address])?;
        if let Some(row) = rows.next()? {
            Ok(Some(user_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn list_all(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, bcc_address, created_at
             FROM users ORDER BY created_at ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(user_from_row(row)?);
        }
        Ok(users)
    }
}

fn user_from_row(row: &Row<'_>) -> Result<User> {
    let id_str: String = row.get(0)?;
    let id = UserId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str))?;
    Ok(User {
        id,
        email: row.get(1)?,
        bcc_address: row.get(2)?,
        created_at: row.get(3)?,
    })
}
