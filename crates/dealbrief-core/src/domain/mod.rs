pub mod address;
pub mod contact;
pub mod ids;
pub mod meeting;
pub mod message;
pub mod organization;
pub mod user;

pub use address::{
    domain_of, is_personal_domain, is_routing_address, normalize_email, parse_address,
    ParsedAddress,
};
pub use contact::Contact;
pub use ids::{ContactId, MeetingId, MessageId, OrgId, UserId};
pub use meeting::Meeting;
pub use message::EmailMessage;
pub use organization::{derive_org_name, Organization};
pub use user::User;
