use bytes::Bytes;

/// Separator between the channel prefix and the log source in a subject.
pub const SUBJECT_SEPARATOR: char = ':';

/// A single message received from the bus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusMessage {
    /// Full subject the message was published on (`<prefix>:<source>`).
    pub subject: String,
    /// Raw payload bytes.
    pub payload: Bytes,
}

impl BusMessage {
    /// Creates a new message.
    pub fn new(subject: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            subject: subject.into(),
            payload: payload.into(),
        }
    }

    /// Returns the source portion of the subject (everything after the first
    /// separator), or `None` for a subject with no separator.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.subject
            .split_once(SUBJECT_SEPARATOR)
            .map(|(_, source)| source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_is_suffix_after_first_separator() {
        let message = BusMessage::new("wslogger:svc1", "hello");
        assert_eq!(message.source(), Some("svc1"));

        let nested = BusMessage::new("wslogger:svc:extra", "hello");
        assert_eq!(nested.source(), Some("svc:extra"));
    }

    #[test]
    fn source_is_none_without_separator() {
        let message = BusMessage::new("wslogger", "hello");
        assert_eq!(message.source(), None);
    }
}
