use crate::payload::ParsedEmail;
use dealbrief_core::domain::domain_of;
use std::collections::HashSet;

/// One person extracted from a message, ready for contact resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub email: String,
    pub name: Option<String>,
    pub domain: Option<String>,
}

/// Participants in resolution order: sender, then To, then Cc. The
/// routing address is excluded and duplicates collapse to their first
/// occurrence, so the sender's entry (with its display name) wins over a
/// repeat in To or Cc. Purely local to one message; nothing is shared
/// across calls.
pub fn extract_participants(email: &ParsedEmail, routing_address: &str) -> Vec<Participant> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut participants = Vec::new();

    push(
        &mut participants,
        &mut seen,
        routing_address,
        &email.from_address,
        email.from_name.as_deref(),
    );
    for address in &email.to_addresses {
        push(&mut participants, &mut seen, routing_address, address, None);
    }
    for address in &email.cc_addresses {
        push(&mut participants, &mut seen, routing_address, address, None);
    }

    participants
}

fn push(
    participants: &mut Vec<Participant>,
    seen: &mut HashSet<String>,
    routing_address: &str,
    email: &str,
    name: Option<&str>,
) {
    if email.is_empty() || email == routing_address {
        return;
    }
    if !seen.insert(email.to_string()) {
        return;
    }
    participants.push(Participant {
        email: email.to_string(),
        name: name.map(str::to_string),
        domain: domain_of(email),
    });
}

#[cfg(test)]
mod tests {
    use super::extract_participants;
    use crate::payload::ParsedEmail;

    fn parsed(from: &str, to: Vec<&str>, cc: Vec<&str>) -> ParsedEmail {
        ParsedEmail {
            message_id: "m1".to_string(),
            thread_id: None,
            from_address: from.to_string(),
            from_name: Some("Sender".to_string()),
            to_addresses: to.into_iter().map(str::to_string).collect(),
            cc_addresses: cc.into_iter().map(str::to_string).collect(),
            subject: "(no subject)".to_string(),
            text_body: None,
            html_body: None,
            sent_at: 0,
            bcc_recipient: None,
        }
    }

    #[test]
    fn sender_first_then_to_then_cc() {
        let email = parsed(
            "jane@acme.com",
            vec!["u_abc@in.example.com", "bob@corp.io"],
            vec!["carol@corp.io"],
        );
        let participants = extract_participants(&email, "u_abc@in.example.com");
        let emails: Vec<&str> = participants.iter().map(|p| p.email.as_str()).collect();
        assert_eq!(emails, vec!["jane@acme.com", "bob@corp.io", "carol@corp.io"]);
        assert_eq!(participants[0].name.as_deref(), Some("Sender"));
        assert_eq!(participants[0].domain.as_deref(), Some("acme.com"));
    }

    #[test]
    fn sender_entry_wins_over_duplicate_in_to() {
        let email = parsed("jane@acme.com", vec!["jane@acme.com"], vec![]);
        let participants = extract_participants(&email, "u_abc@in.example.com");
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].name.as_deref(), Some("Sender"));
    }

    #[test]
    fn routing_address_is_never_a_participant() {
        let email = parsed("jane@acme.com", vec!["u_abc@in.example.com"], vec![]);
        let participants = extract_participants(&email, "u_abc@in.example.com");
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].email, "jane@acme.com");
    }
}
