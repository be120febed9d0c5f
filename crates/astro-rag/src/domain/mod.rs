//! Domain gate: keeps the service on space-science questions

mod gate;
pub mod rejection;

pub use gate::{is_in_scope, DomainGate, VOCABULARY};
pub use rejection::{random_rejection, rejection_message, REJECTION_MESSAGES};
