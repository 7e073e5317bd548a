pub mod error;
pub mod ledger;
pub mod participants;
pub mod payload;
pub mod pipeline;

pub use error::{IngestError, Result};
pub use ledger::Ledger;
pub use participants::{extract_participants, Participant};
pub use payload::{InboundPayload, ParsedEmail};
pub use pipeline::{process_inbound_email, IngestOutcome};
