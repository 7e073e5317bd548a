use crate::error::{Result, StoreError};
use dealbrief_core::domain::{OrgId, Organization, UserId};
use rusqlite::{params, Connection, Row};
use std::str::FromStr;

pub struct OrganizationsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> OrganizationsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn find_by_domain(&self, user_id: UserId, domain: &str) -> Result<Option<Organization>> {
        let domain = domain.trim().to_ascii_lowercase();
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, domain, name, created_at
             FROM organizations
             WHERE user_id = ?1 AND domain = ?2;",
        )?;
        let mut rows = stmt.query(params![user_id.to_string(), domain])?;
        if let Some(row) = rows.next()? {
            Ok(Some(org_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    /// Creates the organization for `(user_id, domain)`. A concurrent
    /// creator may win the unique constraint; the loser re-reads and
    /// returns the winner's row instead of failing.
    pub fn create(
        &self,
        now_utc: i64,
        user_id: UserId,
        domain: &str,
        name: &str,
    ) -> Result<Organization> {
        let domain = domain.trim().to_ascii_lowercase();
        let org = Organization {
            id: OrgId::new(),
            user_id,
            domain: domain.clone(),
            name: name.to_string(),
            created_at: now_utc,
        };
        let inserted = self.conn.execute(
            "INSERT INTO organizations (id, user_id, domain, name, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (user_id, domain) DO NOTHING;",
            params![
                org.id.to_string(),
                org.user_id.to_string(),
                org.domain,
                org.name,
                org.created_at
            ],
        )?;
        if inserted == 0 {
            return self
                .find_by_domain(user_id, &domain)?
                .ok_or_else(|| StoreError::NotFound(format!("organization for {domain}")));
        }
        Ok(org)
    }

    pub fn get(&self, id: OrgId) -> Result<Option<Organization>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, domain, name, created_at
             FROM organizations WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(org_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn list_for_user(&self, user_id: UserId) -> Result<Vec<Organization>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, domain, name, created_at
             FROM organizations
             WHERE user_id = ?1
             ORDER BY name COLLATE NOCASE ASC;",
        )?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut orgs = Vec::new();
        while let Some(row) = rows.next()? {
            orgs.push(org_from_row(row)?);
        }
        Ok(orgs)
    }
}

fn org_from_row(row: &Row<'_>) -> Result<Organization> {
    let id_str: String = row.get(0)?;
    let id = OrgId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str))?;
    let user_str: String = row.get(1)?;
    let user_id = UserId::from_str(&user_str).map_err(|_| StoreError::InvalidId(user_str))?;
    Ok(Organization {
        id,
        user_id,
        domain: row.get(2)?,
        name: row.get(3)?,
        created_at: row.get(4)?,
    })
}
