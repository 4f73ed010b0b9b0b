use crate::config::RelayConfig;
use crate::error::{Error, Result};
use crate::frame::LogFrame;
use crate::path::resolve_log_path;
use crate::render::Render;
use crate::tail::read_tail;

use async_trait::async_trait;
use tracing::{debug, warn};
use wstail_messaging::subject::Subject;
use wstail_messaging::subscription::Subscription;

/// The live connection half of a viewer session.
///
/// Implementations are expected to enforce their own backpressure policy;
/// a viewer that can no longer keep up should start failing sends.
#[async_trait]
pub trait ViewerSink: Send {
    /// Delivers one frame to the viewer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SendClosed`] once the viewer is gone; the session
    /// closes and attempts no further sends.
    async fn send(&mut self, frame: LogFrame) -> Result<()>;
}

/// Drives one viewer connection: seeds the recent history for `source`,
/// then forwards its live lines until the viewer or the bus goes away.
///
/// The subscription is established before the history read starts, so a
/// line published during the read cannot fall into a gap. The converse
/// overlap is accepted: a line already flushed to disk may appear both in
/// the seeded history and again live.
///
/// # Errors
///
/// Returns [`Error::BusDisconnect`] when the bus is lost mid-session. A
/// viewer disconnect is a normal ending and yields `Ok(())`.
pub async fn run<J, R, K>(
    subject: &J,
    source: &str,
    config: &RelayConfig,
    renderer: &R,
    sink: &mut K,
) -> Result<()>
where
    J: Subject,
    R: Render + ?Sized,
    K: ViewerSink + ?Sized,
{
    let mut subscription = subject
        .subscribe()
        .await
        .map_err(|error| Error::BusDisconnect(error.to_string()))?;

    let result = seed_then_stream(&mut subscription, source, config, renderer, sink).await;

    if let Err(error) = subscription.unsubscribe().await {
        debug!("failed to release subscription for {source}: {error}");
    }

    match result {
        Err(Error::SendClosed) => Ok(()),
        other => other,
    }
}

async fn seed_then_stream<S, R, K>(
    subscription: &mut S,
    source: &str,
    config: &RelayConfig,
    renderer: &R,
    sink: &mut K,
) -> Result<()>
where
    S: Subscription,
    R: Render + ?Sized,
    K: ViewerSink + ?Sized,
{
    for line in read_history(source, config).await {
        sink.send(LogFrame::new(source, renderer.render(&line)))
            .await?;
    }

    loop {
        let message = match subscription.next().await {
            Ok(message) => message,
            Err(error) => return Err(Error::BusDisconnect(error.to_string())),
        };

        // The wildcard subscription sees every source's traffic; this
        // session forwards only its own.
        if message.source() != Some(source) {
            continue;
        }

        let line = String::from_utf8_lossy(&message.payload);
        sink.send(LogFrame::new(source, renderer.render(&line)))
            .await?;
    }
}

/// History for seeding. Degrades to empty on any failure: an escaping name
/// gets the same face as a source that was never written to, and a failed
/// read must not abort the session.
async fn read_history(source: &str, config: &RelayConfig) -> Vec<String> {
    let path = match resolve_log_path(&config.root_dir, source).await {
        Ok(path) => path,
        Err(error @ Error::PathEscape { .. }) => {
            debug!("skipping history seed: {error}");
            return Vec::new();
        }
        Err(error) => {
            warn!("history unavailable for {source}: {error}");
            return Vec::new();
        }
    };

    match read_tail(&path, config.tail_bytes).await {
        Ok(lines) => lines,
        Err(error) => {
            warn!("history unavailable for {source}: {error}");
            Vec::new()
        }
    }
}
