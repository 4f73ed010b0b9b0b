//! In-memory implementation of the messaging crate, for tests and
//! single-process development.
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
pub use subject::{MemorySubject, MemoryWildcardSubject};
pub use subscription::MemorySubscription;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};
use wstail_messaging::{BusMessage, SUBJECT_SEPARATOR};

const CHANNEL_CAPACITY: usize = 100;

/// Handle to a shared in-memory bus.
///
/// Clones share the same subscriber state; all publishers and subscribers
/// for one bus must be created from clones of the same handle.
#[derive(Clone, Debug, Default)]
pub struct MemoryBus {
    subjects: Arc<Mutex<HashMap<String, broadcast::Sender<BusMessage>>>>,
}

impl MemoryBus {
    /// Creates a new, empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn register(&self, pattern: &str) -> broadcast::Receiver<BusMessage> {
        let mut subjects = self.subjects.lock().await;
        subjects
            .entry(pattern.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    pub(crate) async fn fan_out(&self, message: BusMessage) {
        let subjects = self.subjects.lock().await;
        for (pattern, sender) in subjects.iter() {
            if subject_matches(pattern, &message.subject) {
                // Errors just mean no live receivers for this pattern.
                let _ = sender.send(message.clone());
            }
        }
    }
}

/// Segment-wise pattern match: `*` matches exactly one segment.
fn subject_matches(pattern: &str, subject: &str) -> bool {
    let pattern_parts: Vec<&str> = pattern.split(SUBJECT_SEPARATOR).collect();
    let subject_parts: Vec<&str> = subject.split(SUBJECT_SEPARATOR).collect();
    pattern_parts.len() == subject_parts.len()
        && pattern_parts
            .iter()
            .zip(subject_parts.iter())
            .all(|(p, s)| *p == "*" || p == s)
}
