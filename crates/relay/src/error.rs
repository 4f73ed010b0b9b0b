//! Error types for the relay data paths.

use std::io;
use std::path::PathBuf;

/// Result type for relay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur on the relay data paths.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Requested log name resolves outside the log root. Never fatal; the
    /// caller must not touch the filesystem under the rejected path.
    #[error("log name {name:?} resolves outside the log root")]
    PathEscape {
        /// The offending log name.
        name: String,
    },

    /// History read failed for reasons other than absence. Callers degrade
    /// to "no history available" and continue.
    #[error("failed to read log history from {path}: {source}")]
    Read {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// Append or rotation failed for one source. Isolated to that source.
    #[error("failed to write log file {path}: {source}")]
    Write {
        /// The file that could not be written.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// The bus subscription was lost. Fatal to the owning relay or session,
    /// never to the whole service.
    #[error("bus subscription lost: {0}")]
    BusDisconnect(String),

    /// The viewer connection is gone. Closes the session.
    #[error("viewer connection closed")]
    SendClosed,
}
