use crate::commands::{print_json, Context};
use crate::util::now_utc;
use anyhow::{Context as _, Result};
use clap::Args;
use dealbrief_ingest::{process_inbound_email, InboundPayload, IngestOutcome};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// JSON payload file; reads stdin when omitted
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct IngestReport {
    outcome: &'static str,
    contacts: usize,
    meeting: Option<String>,
}

pub fn ingest(ctx: &Context<'_>, args: IngestArgs) -> Result<()> {
    let raw = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("read payload file {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .with_context(|| "read payload from stdin")?;
            buffer
        }
    };
    let payload: InboundPayload =
        serde_json::from_str(&raw).with_context(|| "parse inbound payload")?;

    let outcome = process_inbound_email(ctx.store, now_utc(), &payload)?;
    let report = match &outcome {
        IngestOutcome::Processed {
            contacts,
            meeting_id,
            ..
        } => IngestReport {
            outcome: "processed",
            contacts: *contacts,
            meeting: meeting_id.map(|id| id.to_string()),
        },
        IngestOutcome::Unroutable => IngestReport {
            outcome: "unroutable",
            contacts: 0,
            meeting: None,
        },
        IngestOutcome::UnknownRecipient => IngestReport {
            outcome: "unknown-recipient",
            contacts: 0,
            meeting: None,
        },
        IngestOutcome::Duplicate => IngestReport {
            outcome: "duplicate",
            contacts: 0,
            meeting: None,
        },
    };

    if ctx.json {
        return print_json(&report);
    }
    match report.outcome {
        "processed" => {
            println!("Processed: {} contact(s)", report.contacts);
            if let Some(meeting) = &report.meeting {
                println!("Meeting: {}", meeting);
            }
        }
        other => println!("Dropped ({other})"),
    }
    Ok(())
}
