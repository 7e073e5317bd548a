use crate::commands::{print_json, resolve_user, Context};
use crate::error::invalid_input;
use crate::util::{format_timestamp_date, now_utc};
use anyhow::Result;
use clap::Args;
use serde::Serialize;

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Routing (bcc) address of the owning user
    pub user: String,
    /// Window in days (defaults to the configured report window)
    #[arg(long)]
    pub days: Option<i64>,
}

#[derive(Debug, Serialize)]
struct WeeklyBrief {
    window_days: i64,
    since: String,
    emails: i64,
    new_contacts: Vec<BriefContact>,
    meetings: Vec<BriefMeeting>,
}

#[derive(Debug, Serialize)]
struct BriefContact {
    email: String,
    name: Option<String>,
    organization: Option<String>,
}

#[derive(Debug, Serialize)]
struct BriefMeeting {
    title: String,
    meeting_type: String,
    organization: Option<String>,
}

pub fn report(ctx: &Context<'_>, args: ReportArgs) -> Result<()> {
    let window_days = args.days.unwrap_or(ctx.config.report_window_days);
    if window_days <= 0 {
        return Err(invalid_input("--days must be positive"));
    }

    let user = resolve_user(ctx, &args.user)?;
    let since = now_utc() - window_days * 86_400;

    let mut new_contacts = Vec::new();
    for contact in ctx.store.contacts().created_since(user.id, since)? {
        new_contacts.push(BriefContact {
            organization: org_name(ctx, contact.org_id)?,
            email: contact.email,
            name: contact.name,
        });
    }

    let mut meetings = Vec::new();
    for meeting in ctx.store.meetings().created_since(user.id, since)? {
        meetings.push(BriefMeeting {
            organization: org_name(ctx, meeting.org_id)?,
            title: meeting.title,
            meeting_type: meeting.meeting_type.as_str().to_string(),
        });
    }

    let brief = WeeklyBrief {
        window_days,
        since: format_timestamp_date(since),
        emails: ctx.store.messages().count_since(user.id, since)?,
        new_contacts,
        meetings,
    };

    if ctx.json {
        return print_json(&brief);
    }

    println!(
        "Brief for {} (last {} days, since {})",
        user.bcc_address, brief.window_days, brief.since
    );
    println!("Emails ingested: {}", brief.emails);
    println!("New contacts: {}", brief.new_contacts.len());
    for contact in &brief.new_contacts {
        println!(
            "- {} {} {}",
            contact.email,
            contact.name.as_deref().unwrap_or("-"),
            contact.organization.as_deref().unwrap_or("-")
        );
    }
    println!("Meetings: {}", brief.meetings.len());
    for meeting in &brief.meetings {
        println!(
            "- [{}] {} {}",
            meeting.meeting_type,
            meeting.title,
            meeting.organization.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn org_name(
    ctx: &Context<'_>,
    org_id: Option<dealbrief_core::domain::OrgId>,
) -> Result<Option<String>> {
    let Some(org_id) = org_id else {
        return Ok(None);
    };
    Ok(ctx.store.organizations().get(org_id)?.map(|org| org.name))
}
