use crate::error::Error;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::warn;
use wstail_messaging::BusMessage;
use wstail_messaging::subscription::Subscription;

/// An in-memory subscription backed by a broadcast receiver.
#[derive(Debug)]
pub struct MemorySubscription {
    receiver: broadcast::Receiver<BusMessage>,
}

impl MemorySubscription {
    pub(crate) const fn new(receiver: broadcast::Receiver<BusMessage>) -> Self {
        Self { receiver }
    }
}

#[async_trait]
impl Subscription for MemorySubscription {
    type Error = Error;

    async fn next(&mut self) -> Result<BusMessage, Error> {
        loop {
            match self.receiver.recv().await {
                Ok(message) => return Ok(message),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "memory bus subscription lagged, messages dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return Err(Error::Disconnected),
            }
        }
    }

    async fn unsubscribe(self) -> Result<(), Error> {
        // Dropping the receiver is enough; the channel entry stays registered
        // for any later subscriber on the same pattern.
        Ok(())
    }
}
