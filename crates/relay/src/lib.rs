//! Core relays moving log lines from the bus into rotated per-source files
//! and out to live viewer connections.
//!
//! The two relays are independent consumers of the same bus: the file
//! relay demultiplexes every source's lines into its own rotating file,
//! while each viewer session seeds one connection with the recent tail of
//! its source's file and then streams that source's live lines.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

/// Shared relay settings.
pub mod config;

/// Bus-to-file relay: demultiplexes tagged messages into per-source files.
pub mod file_relay;

/// Wire frames delivered to viewers.
pub mod frame;

/// Log-name-to-path resolution, confined to the log root.
pub mod path;

/// Line-to-markup rendering seam.
pub mod render;

/// Bounded read-back of a file's most recent content.
pub mod tail;

/// Per-viewer sessions: history seeding, then live streaming.
pub mod viewer;

/// Rotating per-source writers and their registry.
pub mod writer;

pub use config::RelayConfig;
pub use error::{Error, Result};
pub use frame::LogFrame;
