use crate::error::Error;
use crate::subscription::NatsSubscription;
use crate::to_wire;

use async_nats::Client;
use async_trait::async_trait;
use bytes::Bytes;
use wstail_messaging::SUBJECT_SEPARATOR;
use wstail_messaging::subject::{PublishableSubject, Subject};

fn validate_partial(partial: &str) -> Result<(), Error> {
    if partial.is_empty()
        || partial.contains(SUBJECT_SEPARATOR)
        || partial.contains(['.', '*', '>', ' '])
    {
        return Err(Error::InvalidSubjectPartial);
    }
    Ok(())
}

/// A concrete NATS-backed subject that is both publishable and subscribable.
#[derive(Clone, Debug)]
pub struct NatsSubject {
    client: Client,
    full_subject: String,
}

impl From<NatsSubject> for String {
    fn from(subject: NatsSubject) -> Self {
        subject.full_subject
    }
}

impl NatsSubject {
    /// Creates a new `NatsSubject`.
    ///
    /// # Errors
    ///
    /// Returns an error if the partial contains characters the canonical or
    /// NATS subject forms cannot represent.
    pub fn new(client: Client, subject_partial: impl Into<String>) -> Result<Self, Error> {
        let partial = subject_partial.into();
        validate_partial(&partial)?;
        Ok(Self {
            client,
            full_subject: partial,
        })
    }

    /// Refines the subject with the given concrete scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope contains characters the canonical or
    /// NATS subject forms cannot represent.
    pub fn scope(&self, scope: impl Into<String>) -> Result<Self, Error> {
        let scope = scope.into();
        validate_partial(&scope)?;
        Ok(Self {
            client: self.client.clone(),
            full_subject: format!("{}{SUBJECT_SEPARATOR}{scope}", self.full_subject),
        })
    }

    /// Refines the subject with a wildcard scope.
    #[must_use]
    pub fn any(&self) -> NatsWildcardSubject {
        NatsWildcardSubject {
            client: self.client.clone(),
            full_subject: format!("{}{SUBJECT_SEPARATOR}*", self.full_subject),
        }
    }
}

#[async_trait]
impl Subject for NatsSubject {
    type Error = Error;
    type SubscriptionType = NatsSubscription;

    async fn subscribe(&self) -> Result<NatsSubscription, Error> {
        let subscriber = self
            .client
            .subscribe(to_wire(&self.full_subject))
            .await
            .map_err(|e| Error::Subscribe(e.to_string()))?;
        Ok(NatsSubscription::new(self.full_subject.clone(), subscriber))
    }
}

#[async_trait]
impl PublishableSubject for NatsSubject {
    async fn publish(&self, payload: Bytes) -> Result<(), Error> {
        self.client
            .publish(to_wire(&self.full_subject), payload)
            .await
            .map_err(|e| Error::Publish(e.to_string()))
    }
}

/// A wildcard NATS-backed subject (subscribable only).
#[derive(Clone, Debug)]
pub struct NatsWildcardSubject {
    client: Client,
    full_subject: String,
}

impl From<NatsWildcardSubject> for String {
    fn from(subject: NatsWildcardSubject) -> Self {
        subject.full_subject
    }
}

#[async_trait]
impl Subject for NatsWildcardSubject {
    type Error = Error;
    type SubscriptionType = NatsSubscription;

    async fn subscribe(&self) -> Result<NatsSubscription, Error> {
        let subscriber = self
            .client
            .subscribe(to_wire(&self.full_subject))
            .await
            .map_err(|e| Error::Subscribe(e.to_string()))?;
        Ok(NatsSubscription::new(self.full_subject.clone(), subscriber))
    }
}
