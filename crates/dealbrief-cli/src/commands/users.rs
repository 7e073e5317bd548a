use crate::commands::{print_json, resolve_user, Context};
use crate::util::{format_timestamp_date, format_timestamp_datetime, now_utc};
use anyhow::Result;
use clap::Args;
use dealbrief_store::repo::UserNew;
use uuid::Uuid;

#[derive(Debug, Args)]
pub struct AddUserArgs {
    /// Account email of the new user (not the routing address)
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Debug, Args)]
pub struct ListUsersArgs {}

#[derive(Debug, Args)]
pub struct ListContactsArgs {
    /// Routing (bcc) address of the owning user
    pub user: String,
}

#[derive(Debug, Args)]
pub struct ListMeetingsArgs {
    /// Routing (bcc) address of the owning user
    pub user: String,
}

pub fn add_user(ctx: &Context<'_>, args: AddUserArgs) -> Result<()> {
    let bcc_address = mint_bcc_address(&ctx.config.inbound_domain);
    let user = ctx.store.users().create(
        now_utc(),
        UserNew {
            email: args.email,
            bcc_address,
        },
    )?;

    if ctx.json {
        return print_json(&user);
    }
    println!("Created user {}", user.id);
    println!("Routing address: {}", user.bcc_address);
    Ok(())
}

pub fn list_users(ctx: &Context<'_>, _args: ListUsersArgs) -> Result<()> {
    let users = ctx.store.users().list_all()?;
    if ctx.json {
        return print_json(&users);
    }
    for user in users {
        println!(
            "{}  {}  {}",
            user.bcc_address,
            user.email.as_deref().unwrap_or("-"),
            format_timestamp_date(user.created_at)
        );
    }
    Ok(())
}

pub fn list_contacts(ctx: &Context<'_>, args: ListContactsArgs) -> Result<()> {
    let user = resolve_user(ctx, &args.user)?;
    let contacts = ctx.store.contacts().list_for_user(user.id)?;
    if ctx.json {
        return print_json(&contacts);
    }
    for contact in contacts {
        let org = match contact.org_id {
            Some(org_id) => ctx
                .store
                .organizations()
                .get(org_id)?
                .map(|org| org.name)
                .unwrap_or_else(|| "-".to_string()),
            None => "-".to_string(),
        };
        println!(
            "{}  {}  {}",
            contact.email,
            contact.name.as_deref().unwrap_or("-"),
            org
        );
    }
    Ok(())
}

pub fn list_meetings(ctx: &Context<'_>, args: ListMeetingsArgs) -> Result<()> {
    let user = resolve_user(ctx, &args.user)?;
    let meetings = ctx.store.meetings().list_for_user(user.id)?;
    if ctx.json {
        return print_json(&meetings);
    }
    for meeting in meetings {
        println!(
            "{}  {}  {}",
            format_timestamp_datetime(meeting.created_at),
            meeting.meeting_type.as_str(),
            meeting.title
        );
    }
    Ok(())
}

/// Routing addresses are `u_<opaque-id>@in.<service-domain>`; the id is
/// minted once and never reassigned.
fn mint_bcc_address(inbound_domain: &str) -> String {
    format!("u_{}@{}", Uuid::new_v4().simple(), inbound_domain)
}
