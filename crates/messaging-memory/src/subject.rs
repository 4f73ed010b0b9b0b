use crate::error::Error;
use crate::subscription::MemorySubscription;
use crate::MemoryBus;

use async_trait::async_trait;
use bytes::Bytes;
use wstail_messaging::subject::{PublishableSubject, Subject};
use wstail_messaging::{BusMessage, SUBJECT_SEPARATOR};

fn validate_partial(partial: &str) -> Result<(), Error> {
    if partial.is_empty() || partial.contains(SUBJECT_SEPARATOR) || partial.contains('*') {
        return Err(Error::InvalidSubjectPartial);
    }
    Ok(())
}

/// A concrete in-memory subject that is both publishable and subscribable.
#[derive(Clone, Debug)]
pub struct MemorySubject {
    bus: MemoryBus,
    full_subject: String,
}

impl From<MemorySubject> for String {
    fn from(subject: MemorySubject) -> Self {
        subject.full_subject
    }
}

impl MemorySubject {
    /// Creates a new `MemorySubject` on the given bus.
    ///
    /// # Errors
    ///
    /// Returns an error if the partial contains `:` or `*`.
    pub fn new(bus: &MemoryBus, subject_partial: impl Into<String>) -> Result<Self, Error> {
        let partial = subject_partial.into();
        validate_partial(&partial)?;
        Ok(Self {
            bus: bus.clone(),
            full_subject: partial,
        })
    }

    /// Refines the subject with the given concrete scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope contains `:` or `*`.
    pub fn scope(&self, scope: impl Into<String>) -> Result<Self, Error> {
        let scope = scope.into();
        validate_partial(&scope)?;
        Ok(Self {
            bus: self.bus.clone(),
            full_subject: format!("{}{SUBJECT_SEPARATOR}{scope}", self.full_subject),
        })
    }

    /// Refines the subject with a wildcard scope.
    #[must_use]
    pub fn any(&self) -> MemoryWildcardSubject {
        MemoryWildcardSubject {
            bus: self.bus.clone(),
            full_subject: format!("{}{SUBJECT_SEPARATOR}*", self.full_subject),
        }
    }
}

#[async_trait]
impl Subject for MemorySubject {
    type Error = Error;
    type SubscriptionType = MemorySubscription;

    async fn subscribe(&self) -> Result<MemorySubscription, Error> {
        let receiver = self.bus.register(&self.full_subject).await;
        Ok(MemorySubscription::new(receiver))
    }
}

#[async_trait]
impl PublishableSubject for MemorySubject {
    async fn publish(&self, payload: Bytes) -> Result<(), Error> {
        self.bus
            .fan_out(BusMessage::new(self.full_subject.clone(), payload))
            .await;
        Ok(())
    }
}

/// A wildcard in-memory subject (subscribable only).
#[derive(Clone, Debug)]
pub struct MemoryWildcardSubject {
    bus: MemoryBus,
    full_subject: String,
}

impl From<MemoryWildcardSubject> for String {
    fn from(subject: MemoryWildcardSubject) -> Self {
        subject.full_subject
    }
}

#[async_trait]
impl Subject for MemoryWildcardSubject {
    type Error = Error;
    type SubscriptionType = MemorySubscription;

    async fn subscribe(&self) -> Result<MemorySubscription, Error> {
        let receiver = self.bus.register(&self.full_subject).await;
        Ok(MemorySubscription::new(receiver))
    }
}
