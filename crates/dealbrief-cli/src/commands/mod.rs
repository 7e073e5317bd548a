use anyhow::Result;
use dealbrief_config::AppConfig;
use dealbrief_store::Store;
use serde::Serialize;
use std::io::{self, Write};

pub mod ingest;
pub mod report;
pub mod users;

pub struct Context<'a> {
    pub store: &'a Store,
    pub json: bool,
    pub config: &'a AppConfig,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Resolves a user from a routing (bcc) address argument.
pub fn resolve_user(
    ctx: &Context<'_>,
    address: &str,
) -> Result<dealbrief_core::domain::User> {
    ctx.store
        .users()
        .find_by_bcc_address(address)?
        .ok_or_else(|| crate::error::not_found(format!("no user owns {address}")))
}
