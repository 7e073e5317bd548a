pub mod classify;
pub mod domain;
pub mod error;

pub use classify::{classify_meeting, MeetingType};
pub use domain::*;
pub use error::CoreError;
