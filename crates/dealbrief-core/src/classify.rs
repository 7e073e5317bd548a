use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fixed meeting-type taxonomy. Set once at meeting creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingType {
    Qbr,
    AnnualReview,
    WeeklyCheckin,
    DealReview,
    Other,
}

impl MeetingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::Qbr => "qbr",
            MeetingType::AnnualReview => "annual_review",
            MeetingType::WeeklyCheckin => "weekly_checkin",
            MeetingType::DealReview => "deal_review",
            MeetingType::Other => "other",
        }
    }
}

impl FromStr for MeetingType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "qbr" => Ok(MeetingType::Qbr),
            "annual_review" => Ok(MeetingType::AnnualReview),
            "weekly_checkin" => Ok(MeetingType::WeeklyCheckin),
            "deal_review" => Ok(MeetingType::DealReview),
            "other" => Ok(MeetingType::Other),
            _ => Err(CoreError::UnknownMeetingType(s.to_string())),
        }
    }
}

const CADENCE_TAIL: [&str; 5] = ["sync", "check-in", "checkin", "meeting", "call"];

/// Classifies a subject line into the meeting taxonomy, or `None` when the
/// email is not a meeting. Case-insensitive, first match wins, fixed
/// priority order. Matches are word-bounded, so "qbr" never fires inside
/// an unrelated longer token.
pub fn classify_meeting(subject: &str) -> Option<MeetingType> {
    let lower = subject.to_ascii_lowercase();

    if contains_word(&lower, "qbr") || contains_word(&lower, "quarterly business review") {
        return Some(MeetingType::Qbr);
    }
    if contains_word(&lower, "annual review") || contains_word(&lower, "yearly review") {
        return Some(MeetingType::AnnualReview);
    }
    if cadence_phrase(&lower, "weekly") {
        return Some(MeetingType::WeeklyCheckin);
    }
    if contains_word(&lower, "deal review") || contains_word(&lower, "pipeline review") {
        return Some(MeetingType::DealReview);
    }
    if cadence_phrase(&lower, "monthly") {
        return Some(MeetingType::Other);
    }
    None
}

/// True when `lead` occurs as a word and one of the cadence tails
/// (sync, check-in, meeting, ...) occurs as a word somewhere after it.
fn cadence_phrase(haystack: &str, lead: &str) -> bool {
    let Some(end) = find_word(haystack, lead) else {
        return false;
    };
    let rest = &haystack[end..];
    CADENCE_TAIL.iter().any(|tail| contains_word(rest, tail))
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    find_word(haystack, needle).is_some()
}

/// First word-bounded occurrence of `needle`, returning the byte offset
/// just past the match. Both inputs are expected lowercased.
fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    let bytes = haystack.as_bytes();
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let at = start + pos;
        let end = at + needle.len();
        let before_ok = at == 0 || !bytes[at - 1].is_ascii_alphanumeric();
        let after_ok = end == haystack.len() || !bytes[end].is_ascii_alphanumeric();
        if before_ok && after_ok {
            return Some(end);
        }
        start = at + 1;
    }
    None
}
