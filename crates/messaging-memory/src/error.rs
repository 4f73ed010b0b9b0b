use wstail_messaging::subject::SubjectError;
use wstail_messaging::subscription::SubscriptionError;

/// Errors for the in-memory bus.
#[derive(Clone, Debug, thiserror::Error)]
pub enum Error {
    /// Subject partial contained a separator or wildcard character.
    #[error("subject partial contains a separator or wildcard")]
    InvalidSubjectPartial,

    /// All channel handles for the subscription were dropped.
    #[error("bus channel closed")]
    Disconnected,
}

impl SubjectError for Error {}
impl SubscriptionError for Error {}
