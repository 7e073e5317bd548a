use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("email address is required")]
    EmptyEmail,
    #[error("meeting title is required")]
    EmptyMeetingTitle,
    #[error("unknown meeting type: {0}")]
    UnknownMeetingType(String),
    #[error("invalid routing address: {0}")]
    InvalidRoutingAddress(String),
}
