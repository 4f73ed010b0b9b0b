use std::path::PathBuf;

/// Bytes of history read back to seed a new viewer.
pub const DEFAULT_TAIL_BYTES: u64 = 79_000;

/// Active file size at which the writer rotates.
pub const DEFAULT_ROTATE_THRESHOLD: u64 = 32 * 1024 * 1024;

/// Channel prefix subscribed on the bus.
pub const DEFAULT_CHANNEL_PREFIX: &str = "wslogger";

/// Settings shared by the file and viewer relays.
#[derive(Clone, Debug)]
pub struct RelayConfig {
    /// Directory all log files are confined to.
    pub root_dir: PathBuf,
    /// Channel prefix on the bus (`<prefix>:<source>` subjects).
    pub channel_prefix: String,
    /// Active file size threshold triggering rotation.
    pub rotate_threshold: u64,
    /// Bytes of history read back when seeding a viewer.
    pub tail_bytes: u64,
}

impl RelayConfig {
    /// Creates a config rooted at `root_dir` with default thresholds.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            channel_prefix: DEFAULT_CHANNEL_PREFIX.to_string(),
            rotate_threshold: DEFAULT_ROTATE_THRESHOLD,
            tail_bytes: DEFAULT_TAIL_BYTES,
        }
    }
}
