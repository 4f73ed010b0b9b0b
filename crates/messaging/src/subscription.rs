use crate::message::BusMessage;

use std::error::Error;
use std::fmt::Debug;

use async_trait::async_trait;

/// Marker trait for subscription errors
pub trait SubscriptionError: Error + Send + Sync + 'static {}

/// A live stream of messages for one subject or pattern.
///
/// Messages published on the same subject are yielded in publish order; no
/// ordering is guaranteed across subjects.
#[async_trait]
pub trait Subscription
where
    Self: Debug + Send + 'static,
{
    /// The error type for the subscription.
    type Error: SubscriptionError;

    /// Waits for the next message.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying bus connection is lost; the
    /// subscription yields no further messages afterwards.
    async fn next(&mut self) -> Result<BusMessage, Self::Error>;

    /// Releases the subscription.
    async fn unsubscribe(self) -> Result<(), Self::Error>;
}
