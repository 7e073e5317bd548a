use crate::domain::ids::{OrgId, UserId};
use serde::{Deserialize, Serialize};

/// An organization seen in a user's inbound mail, keyed by
/// `(user_id, domain)`. The domain is always corporate; personal-webmail
/// participants never produce one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrgId,
    pub user_id: UserId,
    pub domain: String,
    pub name: String,
    pub created_at: i64,
}

const STRIP_TLDS: [&str; 7] = [".com", ".io", ".co", ".org", ".net", ".app", ".dev"];

/// Human-readable name derived from a domain at creation time, e.g.
/// `acme-corp.com` -> "Acme Corp". Runs once; existing organizations are
/// never renamed by later mail.
pub fn derive_org_name(domain: &str) -> String {
    let lower = domain.trim().to_ascii_lowercase();
    let mut stem = lower.as_str();
    for tld in STRIP_TLDS {
        if let Some(stripped) = stem.strip_suffix(tld) {
            stem = stripped;
            break;
        }
    }
    stem.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
