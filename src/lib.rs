//! Adhan Playback Library
//!
//! This library provides the core functionality for the adhan playback
//! daemon and CLI. It includes:
//! - Playback controller owning the single adhan audio session
//! - Alarm-category audio routing attributes
//! - IPC server/client for the playback command channel
//! - CLI command parsing and display utilities
//! - Type definitions for commands and wire messages

pub mod cli;
pub mod daemon;
pub mod playback;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    AudioContentType, AudioUsage, CommandRequest, CommandResponse, PlaybackAttributes,
    PlaybackCommand, PlaybackState, ACK, START_PLAYBACK, STOP_PLAYBACK,
};

// Re-export playback types
pub use playback::{
    play_adhan, MockBackend, PlaybackBackend, PlaybackController, PlaybackError, RodioBackend,
    SessionHandle,
};
