//! Core data types for adhan playback.
//!
//! This module defines the data structures used for:
//! - Command decoding from the wire channel
//! - Request/response serialization
//! - Audio routing attributes for alarm-category playback

use serde::{Deserialize, Serialize};

/// Fixed acknowledgment value returned for recognized commands.
///
/// Both `startPlayback` and `stopPlayback` always answer with this value,
/// even when the audio subsystem failed internally.
pub const ACK: i64 = 1;

/// Wire name of the start command.
pub const START_PLAYBACK: &str = "startPlayback";

/// Wire name of the stop command.
pub const STOP_PLAYBACK: &str = "stopPlayback";

// ============================================================================
// PlaybackCommand
// ============================================================================

/// A command decoded from the incoming wire name.
///
/// The channel dispatches by name; anything other than the two known
/// commands is preserved as `Unknown` so the handler can answer with a
/// "not implemented" signal instead of a decode error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackCommand {
    /// Begin playback of the bundled adhan recording.
    Start,
    /// Stop playback and release the native audio resource.
    Stop,
    /// Any unrecognized command name.
    Unknown(String),
}

impl PlaybackCommand {
    /// Decodes a command from its wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            START_PLAYBACK => PlaybackCommand::Start,
            STOP_PLAYBACK => PlaybackCommand::Stop,
            other => PlaybackCommand::Unknown(other.to_string()),
        }
    }

    /// Returns the wire name of the command.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            PlaybackCommand::Start => START_PLAYBACK,
            PlaybackCommand::Stop => STOP_PLAYBACK,
            PlaybackCommand::Unknown(name) => name,
        }
    }

    /// Returns true if the command is one of the two recognized operations.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, PlaybackCommand::Unknown(_))
    }
}

// ============================================================================
// PlaybackState
// ============================================================================

/// Observable state of the playback controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// No active playback session
    #[default]
    Idle,
    /// A playback session is active
    Playing,
}

impl PlaybackState {
    /// Returns the string representation of the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Playing => "playing",
        }
    }

    /// Returns true if a session is active.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }
}

// ============================================================================
// Audio routing attributes
// ============================================================================

/// Audio usage category for the platform mixer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioUsage {
    /// Alarm sounds: play at alarm volume, bypass mute toggles.
    Alarm,
    /// Regular media playback.
    Media,
    /// Short notification cues.
    Notification,
}

impl AudioUsage {
    /// Returns the string representation of the usage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioUsage::Alarm => "alarm",
            AudioUsage::Media => "media",
            AudioUsage::Notification => "notification",
        }
    }

    /// Returns true if this usage is exempt from the player-level mute toggle.
    #[must_use]
    pub fn bypasses_mute(&self) -> bool {
        matches!(self, AudioUsage::Alarm)
    }
}

/// Content type hint for the platform mixer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioContentType {
    /// Non-music signal sounds (alarms, rings, cues).
    Sonification,
    /// Music content.
    Music,
    /// Spoken audio.
    Speech,
}

impl AudioContentType {
    /// Returns the string representation of the content type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioContentType::Sonification => "sonification",
            AudioContentType::Music => "music",
            AudioContentType::Speech => "speech",
        }
    }
}

/// Routing attributes attached to a playback session.
///
/// Adhan playback is fixed to alarm usage with sonification content, so the
/// sound respects alarm volume and is not suppressed by ordinary muting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackAttributes {
    /// Usage category
    pub usage: AudioUsage,
    /// Content type hint
    pub content_type: AudioContentType,
}

impl PlaybackAttributes {
    /// The fixed attributes used for adhan playback.
    #[must_use]
    pub fn alarm() -> Self {
        Self {
            usage: AudioUsage::Alarm,
            content_type: AudioContentType::Sonification,
        }
    }

    /// Returns true if sessions with these attributes ignore the mute toggle.
    #[must_use]
    pub fn bypasses_mute(&self) -> bool {
        self.usage.bypasses_mute()
    }
}

impl Default for PlaybackAttributes {
    fn default() -> Self {
        Self::alarm()
    }
}

// ============================================================================
// CommandRequest
// ============================================================================

/// Wire request: a single name-dispatched command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRequest {
    /// The command name (e.g. `startPlayback`)
    pub command: String,
}

impl CommandRequest {
    /// Creates a request for the given command.
    #[must_use]
    pub fn new(command: &PlaybackCommand) -> Self {
        Self {
            command: command.name().to_string(),
        }
    }

    /// Decodes the command name into a [`PlaybackCommand`].
    #[must_use]
    pub fn decode(&self) -> PlaybackCommand {
        PlaybackCommand::from_name(&self.command)
    }
}

// ============================================================================
// CommandResponse
// ============================================================================

/// Wire response for a command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// Response status ("success" or "not_implemented")
    pub status: String,
    /// Human-readable message
    pub message: String,
    /// Acknowledgment value for recognized commands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<i64>,
}

impl CommandResponse {
    /// Creates the fixed success acknowledgment.
    #[must_use]
    pub fn ack(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            result: Some(ACK),
        }
    }

    /// Creates the "not implemented" signal for an unrecognized command.
    #[must_use]
    pub fn not_implemented(command: &str) -> Self {
        Self {
            status: "not_implemented".to_string(),
            message: format!("Command not implemented: {}", command),
            result: None,
        }
    }

    /// Returns true if this is the success acknowledgment.
    #[must_use]
    pub fn is_ack(&self) -> bool {
        self.status == "success" && self.result == Some(ACK)
    }
}

// ============================================================================
// Tests
// ============================================================================
