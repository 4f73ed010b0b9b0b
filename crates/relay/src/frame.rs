use serde::{Deserialize, Serialize};

/// One rendered log line, as delivered to a viewer.
///
/// Encoded as JSON on the wire: `{"name": "<source>", "line": "<markup>"}`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct LogFrame {
    /// The log source the line belongs to.
    pub name: String,
    /// Rendered markup for the line.
    pub line: String,
}

impl LogFrame {
    /// Creates a new frame.
    pub fn new(name: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            line: line.into(),
        }
    }
}
