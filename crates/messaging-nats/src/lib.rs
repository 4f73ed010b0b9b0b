//! NATS implementation of the messaging crate.
//!
//! Canonical subjects use `:` between the channel prefix and the log source;
//! NATS tokenizes subjects on `.`, so subjects are rewritten on the wire
//! (`prefix:source` becomes `prefix.source`, and the canonical pattern
//! `prefix:*` becomes the NATS single-token wildcard `prefix.*`) and mapped
//! back on receipt. Callers only ever see the canonical form.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

/// Subjects are named channels for messages.
pub mod subject;

/// Subscriptions consume messages from subjects.
pub mod subscription;

pub use error::Error;
pub use subject::{NatsSubject, NatsWildcardSubject};
pub use subscription::NatsSubscription;

use wstail_messaging::SUBJECT_SEPARATOR;

const NATS_SEPARATOR: char = '.';

fn to_wire(subject: &str) -> String {
    subject.replace(SUBJECT_SEPARATOR, ".")
}

fn from_wire(subject: &str) -> String {
    subject.replace(NATS_SEPARATOR, ":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_mapping_round_trips() {
        assert_eq!(to_wire("wslogger:svc1"), "wslogger.svc1");
        assert_eq!(to_wire("wslogger:*"), "wslogger.*");
        assert_eq!(from_wire("wslogger.svc1"), "wslogger:svc1");
        assert_eq!(from_wire(&to_wire("wslogger:svc1")), "wslogger:svc1");
    }
}
