//! Playback error types.
//!
//! All failures here are recovered locally: the controller logs them and
//! forces its state back to idle, and the command layer never surfaces them
//! to the caller.

use thiserror::Error;

/// Errors that can occur in the playback subsystem.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Audio output device is not available (e.g. no speakers, headless host).
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// The bundled recording could not be decoded.
    #[error("failed to decode bundled recording: {0}")]
    DecodeError(String),

    /// The audio output stream or sink could not be created.
    #[error("failed to create audio stream: {0}")]
    StreamError(String),

    /// Generic backend failure (thread spawn, halt, construction handshake).
    #[error("playback backend error: {0}")]
    Backend(String),
}

impl PlaybackError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if this error means the bundled asset itself is unusable.
    #[must_use]
    pub fn is_resource_error(&self) -> bool {
        matches!(self, Self::DecodeError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlaybackError::DeviceNotAvailable("no device".to_string());
        assert!(err.to_string().contains("no device"));
        assert!(err.to_string().contains("audio device not available"));

        let err = PlaybackError::DecodeError("bad header".to_string());
        assert!(err.to_string().contains("bad header"));

        let err = PlaybackError::StreamError("stream failed".to_string());
        assert!(err.to_string().contains("stream failed"));

        let err = PlaybackError::Backend("thread died".to_string());
        assert!(err.to_string().contains("thread died"));
    }

    #[test]
    fn test_is_device_error() {
        assert!(PlaybackError::DeviceNotAvailable("x".into()).is_device_error());
        assert!(PlaybackError::StreamError("x".into()).is_device_error());
        assert!(!PlaybackError::DecodeError("x".into()).is_device_error());
        assert!(!PlaybackError::Backend("x".into()).is_device_error());
    }

    #[test]
    fn test_is_resource_error() {
        assert!(PlaybackError::DecodeError("x".into()).is_resource_error());
        assert!(!PlaybackError::DeviceNotAvailable("x".into()).is_resource_error());
        assert!(!PlaybackError::Backend("x".into()).is_resource_error());
    }
}
