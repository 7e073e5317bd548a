use serde::{Deserialize, Serialize};

/// A display name / address pair as it appears in a From/To/Cc field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAddress {
    pub name: Option<String>,
    pub email: String,
}

/// Consumer webmail domains that never become an Organization.
/// Static configuration data, matched case-insensitively.
const PERSONAL_DOMAINS: [&str; 17] = [
    "gmail.com",
    "googlemail.com",
    "yahoo.com",
    "yahoo.co.uk",
    "hotmail.com",
    "outlook.com",
    "live.com",
    "msn.com",
    "icloud.com",
    "me.com",
    "mac.com",
    "aol.com",
    "protonmail.com",
    "proton.me",
    "zoho.com",
    "gmx.com",
    "hey.com",
];

pub fn normalize_email(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_ascii_lowercase())
}

/// Parses `"Display Name" <addr>`, `Name <addr>`, `<addr>`, or a bare
/// address. The email is lowercased and trimmed; an absent display name
/// yields `None`, never a synthesized default.
pub fn parse_address(raw: &str) -> ParsedAddress {
    let trimmed = raw.trim();
    if let (Some(open), Some(close)) = (trimmed.rfind('<'), trimmed.rfind('>')) {
        if open < close {
            let email = trimmed[open + 1..close].trim().to_ascii_lowercase();
            let name = trimmed[..open].trim().trim_matches('"').trim();
            let name = if name.is_empty() {
                None
            } else {
                Some(name.to_string())
            };
            return ParsedAddress { name, email };
        }
    }
    ParsedAddress {
        name: None,
        email: trimmed.to_ascii_lowercase(),
    }
}

/// Registrable domain of an address: the part after the `@`, lowercased.
/// Addresses with zero or more than one `@` are ambiguous and yield `None`.
pub fn domain_of(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.chars().filter(|c| *c == '@').count() != 1 {
        return None;
    }
    let (_, domain) = trimmed.split_once('@')?;
    if domain.is_empty() {
        return None;
    }
    Some(domain.to_ascii_lowercase())
}

/// A missing or empty domain counts as personal: such a participant gets
/// a Contact but never an Organization.
pub fn is_personal_domain(domain: Option<&str>) -> bool {
    let Some(domain) = domain else {
        return true;
    };
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return true;
    }
    let lower = trimmed.to_ascii_lowercase();
    PERSONAL_DOMAINS.iter().any(|entry| *entry == lower)
}

/// System-owned routing address shape: `u_<id>@in.<service-domain>`.
pub fn is_routing_address(email: &str) -> bool {
    let Some((local, domain)) = email.trim().split_once('@') else {
        return false;
    };
    local.starts_with("u_") && domain.starts_with("in.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_address_quoted_display_name() {
        let parsed = parse_address("\"Jane Doe\" <Jane@Acme-Corp.com>");
        assert_eq!(parsed.name.as_deref(), Some("Jane Doe"));
        assert_eq!(parsed.email, "jane@acme-corp.com");
    }

    #[test]
    fn parse_address_unquoted_and_bare_forms() {
        let parsed = parse_address("Jane Doe <jane@acme.com>");
        assert_eq!(parsed.name.as_deref(), Some("Jane Doe"));

        let parsed = parse_address("<jane@acme.com>");
        assert_eq!(parsed.name, None);
        assert_eq!(parsed.email, "jane@acme.com");

        let parsed = parse_address("  JANE@acme.com ");
        assert_eq!(parsed.name, None);
        assert_eq!(parsed.email, "jane@acme.com");
    }

    #[test]
    fn domain_of_requires_exactly_one_at() {
        assert_eq!(domain_of("jane@Acme.COM").as_deref(), Some("acme.com"));
        assert_eq!(domain_of("no-at-sign"), None);
        assert_eq!(domain_of("a@b@c.com"), None);
        assert_eq!(domain_of("jane@"), None);
    }

    #[test]
    fn personal_domains_are_case_insensitive() {
        assert!(is_personal_domain(Some("GMAIL.com")));
        assert!(is_personal_domain(Some("")));
        assert!(is_personal_domain(None));
        assert!(!is_personal_domain(Some("acme-corp.com")));
    }

    #[test]
    fn routing_address_shape() {
        assert!(is_routing_address("u_abc123@in.example.com"));
        assert!(!is_routing_address("jane@in.example.com"));
        assert!(!is_routing_address("u_abc123@example.com"));
        assert!(!is_routing_address("u_abc123"));
    }
}
