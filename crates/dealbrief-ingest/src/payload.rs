use crate::error::{IngestError, Result};
use chrono::DateTime;
use dealbrief_core::domain::{is_routing_address, parse_address};
use serde::Deserialize;
use std::collections::HashMap;

/// The canonical inbound payload, as delivered by the webhook boundary.
/// Provider-specific wire shapes are translated upstream; this core never
/// sniffs provider identity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundPayload {
    pub message_id: String,
    pub from: Option<String>,
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub bcc: Vec<String>,
    pub subject: Option<String>,
    pub text_body: Option<String>,
    pub html_body: Option<String>,
    /// ISO-8601 timestamp string, when the provider supplies one.
    pub sent_at: Option<String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// Normalized form of one inbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEmail {
    pub message_id: String,
    pub thread_id: Option<String>,
    /// Empty when the payload carried no `from` field.
    pub from_address: String,
    pub from_name: Option<String>,
    pub to_addresses: Vec<String>,
    pub cc_addresses: Vec<String>,
    pub subject: String,
    pub text_body: Option<String>,
    pub html_body: Option<String>,
    pub sent_at: i64,
    /// The one bcc entry matching the `u_*@in.*` routing shape, if any.
    pub bcc_recipient: Option<String>,
}

/// Converts the canonical payload into a `ParsedEmail`. A payload with
/// neither `from` nor `to` is unprocessable.
pub fn normalize(payload: &InboundPayload, now_utc: i64) -> Result<ParsedEmail> {
    if payload.from.is_none() && payload.to.is_empty() {
        return Err(IngestError::InvalidPayload);
    }

    let (from_address, from_name) = match payload.from.as_deref() {
        Some(raw) => {
            let parsed = parse_address(raw);
            (parsed.email, parsed.name)
        }
        None => (String::new(), None),
    };

    let to_addresses: Vec<String> = payload
        .to
        .iter()
        .map(|raw| parse_address(raw).email)
        .filter(|email| !email.is_empty())
        .collect();
    let cc_addresses: Vec<String> = payload
        .cc
        .iter()
        .map(|raw| parse_address(raw).email)
        .filter(|email| !email.is_empty())
        .collect();

    let bcc_recipient = payload
        .bcc
        .iter()
        .map(|raw| parse_address(raw).email)
        .find(|email| is_routing_address(email));

    let sent_at = payload
        .sent_at
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.timestamp())
        .unwrap_or(now_utc);

    Ok(ParsedEmail {
        message_id: payload.message_id.clone(),
        thread_id: thread_id_from_headers(&payload.headers),
        from_address,
        from_name,
        to_addresses,
        cc_addresses,
        subject: payload
            .subject
            .clone()
            .unwrap_or_else(|| "(no subject)".to_string()),
        text_body: payload.text_body.clone(),
        html_body: payload.html_body.clone(),
        sent_at,
        bcc_recipient,
    })
}

/// Thread key from `In-Reply-To`, falling back to the first token of
/// `References`. Angle brackets are stripped; header names match
/// case-insensitively.
fn thread_id_from_headers(headers: &HashMap<String, String>) -> Option<String> {
    if let Some(value) = header_value(headers, "in-reply-to") {
        if let Some(id) = strip_angle_brackets(value) {
            return Some(id);
        }
    }
    let references = header_value(headers, "references")?;
    references
        .split_whitespace()
        .next()
        .and_then(strip_angle_brackets)
}

fn header_value<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

fn strip_angle_brackets(value: &str) -> Option<String> {
    let trimmed = value.trim().trim_matches(&['<', '>'][..]).trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_json(raw: &str) -> InboundPayload {
        serde_json::from_str(raw).expect("parse payload")
    }

    #[test]
    fn rejects_payload_with_neither_from_nor_to() {
        let payload = payload_json(r#"{"messageId": "m1", "subject": "hi"}"#);
        assert!(matches!(
            normalize(&payload, 1_700_000_000),
            Err(IngestError::InvalidPayload)
        ));
    }

    #[test]
    fn normalizes_addresses_and_defaults_subject() {
        let payload = payload_json(
            r#"{
                "messageId": "m1",
                "from": "\"Jane Doe\" <Jane@Acme.com>",
                "to": ["u_abc@in.example.com", "Bob <BOB@corp.io>"]
            }"#,
        );
        let parsed = normalize(&payload, 1_700_000_000).expect("normalize");
        assert_eq!(parsed.from_address, "jane@acme.com");
        assert_eq!(parsed.from_name.as_deref(), Some("Jane Doe"));
        assert_eq!(
            parsed.to_addresses,
            vec!["u_abc@in.example.com", "bob@corp.io"]
        );
        assert_eq!(parsed.subject, "(no subject)");
        assert_eq!(parsed.sent_at, 1_700_000_000);
    }

    #[test]
    fn thread_id_prefers_in_reply_to() {
        let payload = payload_json(
            r#"{
                "messageId": "m1",
                "from": "a@b.com",
                "to": [],
                "headers": {
                    "In-Reply-To": "<parent@provider>",
                    "References": "<root@provider> <parent@provider>"
                }
            }"#,
        );
        let parsed = normalize(&payload, 0).expect("normalize");
        assert_eq!(parsed.thread_id.as_deref(), Some("parent@provider"));
    }

    #[test]
    fn thread_id_falls_back_to_first_reference() {
        let payload = payload_json(
            r#"{
                "messageId": "m1",
                "from": "a@b.com",
                "headers": {"references": "<root@provider> <parent@provider>"}
            }"#,
        );
        let parsed = normalize(&payload, 0).expect("normalize");
        assert_eq!(parsed.thread_id.as_deref(), Some("root@provider"));
    }

    #[test]
    fn sent_at_parses_rfc3339_with_now_fallback() {
        let payload = payload_json(
            r#"{
                "messageId": "m1",
                "from": "a@b.com",
                "sentAt": "2026-08-20T12:00:00Z"
            }"#,
        );
        let parsed = normalize(&payload, 1).expect("normalize");
        assert_eq!(parsed.sent_at, 1_787_227_200);

        let payload = payload_json(
            r#"{"messageId": "m1", "from": "a@b.com", "sentAt": "not a date"}"#,
        );
        let parsed = normalize(&payload, 42).expect("normalize");
        assert_eq!(parsed.sent_at, 42);
    }

    #[test]
    fn bcc_recipient_requires_routing_shape() {
        let payload = payload_json(
            r#"{
                "messageId": "m1",
                "from": "a@b.com",
                "bcc": ["archive@corp.com", "u_xyz@in.example.com"]
            }"#,
        );
        let parsed = normalize(&payload, 0).expect("normalize");
        assert_eq!(parsed.bcc_recipient.as_deref(), Some("u_xyz@in.example.com"));
    }
}
