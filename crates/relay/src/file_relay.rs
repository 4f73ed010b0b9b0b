use crate::error::{Error, Result};
use crate::writer::WriterRegistry;

use tracing::{debug, warn};
use wstail_messaging::subscription::Subscription;

/// Consumes every source under the channel prefix and routes each line to
/// its source's file.
///
/// Runs for the lifetime of the service. Per-source failures (path escapes,
/// full disks, permission loss) are logged and the loop keeps consuming;
/// only losing the bus ends it.
///
/// # Errors
///
/// Returns [`Error::BusDisconnect`] once the subscription is lost. The
/// caller decides whether that is process-fatal.
pub async fn run<S>(mut subscription: S, mut registry: WriterRegistry) -> Result<()>
where
    S: Subscription,
{
    loop {
        let message = match subscription.next().await {
            Ok(message) => message,
            Err(error) => return Err(Error::BusDisconnect(error.to_string())),
        };

        let Some(source) = message.source() else {
            debug!("ignoring message with no source suffix: {}", message.subject);
            continue;
        };

        let line = String::from_utf8_lossy(&message.payload);
        if let Err(error) = registry.route(source, &line).await {
            warn!("dropping line for {source}: {error}");
        }
    }
}
