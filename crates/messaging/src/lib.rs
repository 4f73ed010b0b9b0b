//! Abstract interface for the log distribution bus.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Messages are tagged payloads received from the bus.
pub mod message;

/// Subjects are named channels for messages.
pub mod subject;

/// Subscriptions consume messages from subjects.
pub mod subscription;

pub use message::{BusMessage, SUBJECT_SEPARATOR};
