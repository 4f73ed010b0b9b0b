use crate::subscription::Subscription;

use std::error::Error;
use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;

/// Marker trait for subject errors
pub trait SubjectError: Error + Send + Sync + 'static {}

/// Base subject trait: a named channel, or a wildcard pattern over one
/// scope of channels, that can be subscribed to.
#[async_trait]
pub trait Subject
where
    Self: Clone + Debug + Into<String> + Send + Sync + 'static,
{
    /// The error type for the subject.
    type Error: SubjectError;

    /// The type of subscription returned by the subject.
    type SubscriptionType: Subscription;

    /// Subscribe to messages on the subject.
    async fn subscribe(&self) -> Result<Self::SubscriptionType, Self::Error>;
}

/// Capability to publish messages (lost if wildcard scoped)
#[async_trait]
pub trait PublishableSubject: Subject {
    /// Publish a payload to the subject.
    async fn publish(&self, payload: Bytes) -> Result<(), Self::Error>;
}
