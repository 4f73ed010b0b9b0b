use crate::error::Error;
use crate::from_wire;

use std::fmt::{self, Debug};

use async_nats::Subscriber;
use async_trait::async_trait;
use futures::StreamExt;
use wstail_messaging::BusMessage;
use wstail_messaging::subscription::Subscription;

/// A NATS-backed subscription.
pub struct NatsSubscription {
    subject: String,
    subscriber: Subscriber,
}

impl NatsSubscription {
    pub(crate) const fn new(subject: String, subscriber: Subscriber) -> Self {
        Self {
            subject,
            subscriber,
        }
    }
}

impl Debug for NatsSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NatsSubscription")
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Subscription for NatsSubscription {
    type Error = Error;

    async fn next(&mut self) -> Result<BusMessage, Error> {
        let message = self.subscriber.next().await.ok_or(Error::Disconnected)?;
        Ok(BusMessage::new(
            from_wire(message.subject.as_str()),
            message.payload,
        ))
    }

    async fn unsubscribe(mut self) -> Result<(), Error> {
        self.subscriber
            .unsubscribe()
            .await
            .map_err(|e| Error::Unsubscribe(e.to_string()))
    }
}
