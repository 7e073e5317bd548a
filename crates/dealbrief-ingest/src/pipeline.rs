use crate::error::Result;
use crate::ledger::Ledger;
use crate::participants::extract_participants;
use crate::payload::{self, InboundPayload};
use dealbrief_core::classify::classify_meeting;
use dealbrief_core::domain::{
    derive_org_name, is_personal_domain, is_routing_address, MeetingId, OrgId, UserId,
};
use dealbrief_store::repo::{ContactNew, MeetingNew, MessageNew};
use std::collections::HashMap;
use tracing::{debug, info};

/// What happened to one webhook delivery. Drops and duplicates are
/// successes from the provider's point of view; only store failures
/// surface as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Processed {
        user_id: UserId,
        contacts: usize,
        meeting_id: Option<MeetingId>,
    },
    /// No routing address anywhere in bcc or To.
    Unroutable,
    /// Routing address present but no user owns it.
    UnknownRecipient,
    /// `(user_id, message_id)` was already recorded.
    Duplicate,
}

/// Processes one inbound email payload: normalize, attribute to a user,
/// resolve contacts and organizations, classify and resolve a meeting,
/// and append the message ledger row. One sequential pass, no internal
/// retries; webhook-transport retries are safe because every step is an
/// idempotent upsert and the ledger insert dedupes on message id.
pub fn process_inbound_email<L: Ledger>(
    ledger: &L,
    now_utc: i64,
    payload: &InboundPayload,
) -> Result<IngestOutcome> {
    let parsed = payload::normalize(payload, now_utc)?;

    // Prefer the bcc routing address; some mail systems echo bcc into To
    // for certain recipients, so scan To as a fallback.
    let routing_address = parsed.bcc_recipient.clone().or_else(|| {
        parsed
            .to_addresses
            .iter()
            .find(|address| is_routing_address(address))
            .cloned()
    });
    let Some(routing_address) = routing_address else {
        debug!(message_id = %parsed.message_id, "no routing address, dropping");
        return Ok(IngestOutcome::Unroutable);
    };

    let Some(user) = ledger.user_by_routing_address(&routing_address)? else {
        info!(
            message_id = %parsed.message_id,
            address = %routing_address,
            "no user owns routing address, dropping"
        );
        return Ok(IngestOutcome::UnknownRecipient);
    };

    let participants = extract_participants(&parsed, &routing_address);

    // Per-message accumulator only; participant order (sender, To, Cc)
    // determines which organization a new meeting is linked to.
    let mut org_by_participant: HashMap<String, Option<OrgId>> = HashMap::new();
    for participant in &participants {
        let org_id = match participant.domain.as_deref() {
            Some(domain) if !is_personal_domain(Some(domain)) => {
                let org = match ledger.org_by_domain(user.id, domain)? {
                    Some(existing) => existing,
                    None => ledger.create_org(now_utc, user.id, domain, &derive_org_name(domain))?,
                };
                Some(org.id)
            }
            _ => None,
        };

        match ledger.contact_by_email(user.id, &participant.email)? {
            Some(existing) => {
                if existing.name.is_none() {
                    if let Some(name) = participant.name.as_deref() {
                        ledger.backfill_contact_name(now_utc, existing.id, name)?;
                    }
                }
            }
            None => {
                ledger.create_contact(
                    now_utc,
                    user.id,
                    ContactNew {
                        email: participant.email.clone(),
                        name: participant.name.clone(),
                        org_id,
                    },
                )?;
            }
        }

        org_by_participant.insert(participant.email.clone(), org_id);
    }

    let mut meeting_id = None;
    if let Some(meeting_type) = classify_meeting(&parsed.subject) {
        let first_participant_org = participants
            .first()
            .and_then(|participant| org_by_participant.get(&participant.email))
            .copied()
            .flatten();
        let meeting = match ledger.latest_meeting_by_title(user.id, &parsed.subject)? {
            Some(existing) => existing,
            None => ledger.create_meeting(
                now_utc,
                user.id,
                MeetingNew {
                    title: parsed.subject.clone(),
                    meeting_type,
                    org_id: first_participant_org,
                },
            )?,
        };
        meeting_id = Some(meeting.id);
    }

    let record = MessageNew {
        message_id: parsed.message_id.clone(),
        thread_id: parsed.thread_id.clone(),
        from_address: parsed.from_address.clone(),
        from_name: parsed.from_name.clone(),
        to_addresses: parsed.to_addresses.clone(),
        cc_addresses: parsed.cc_addresses.clone(),
        subject: parsed.subject.clone(),
        text_body: parsed.text_body.clone(),
        html_body: parsed.html_body.clone(),
        meeting_id,
        // Deal linkage is not resolved at ingest time.
        deal_id: None,
        sent_at: parsed.sent_at,
    };
    if !ledger.record_message(now_utc, user.id, &record)? {
        info!(
            message_id = %parsed.message_id,
            user_id = %user.id,
            "message already processed"
        );
        return Ok(IngestOutcome::Duplicate);
    }

    Ok(IngestOutcome::Processed {
        user_id: user.id,
        contacts: participants.len(),
        meeting_id,
    })
}
