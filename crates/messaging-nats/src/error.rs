use wstail_messaging::subject::SubjectError;
use wstail_messaging::subscription::SubscriptionError;

/// Errors for the NATS-backed bus.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Subject partial contained a character NATS or the canonical subject
    /// form cannot represent.
    #[error("subject partial contains a separator or wildcard")]
    InvalidSubjectPartial,

    /// Subscribe request failed.
    #[error("failed to subscribe: {0}")]
    Subscribe(String),

    /// Publish request failed.
    #[error("failed to publish: {0}")]
    Publish(String),

    /// Unsubscribe request failed.
    #[error("failed to unsubscribe: {0}")]
    Unsubscribe(String),

    /// The connection to the NATS server was lost.
    #[error("nats connection closed")]
    Disconnected,
}

impl SubjectError for Error {}
impl SubscriptionError for Error {}
