//! IPC server for the adhan playback daemon.
//!
//! This module provides Unix Domain Socket IPC functionality:
//! - Server that listens on a Unix socket
//! - Request/response handling for the playback command channel
//! - Dispatch to the PlaybackController

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::time::{timeout, Duration};
use tracing::warn;

use crate::playback::PlaybackController;
use crate::types::{CommandRequest, CommandResponse, PlaybackCommand};

// ============================================================================
// Constants
// ============================================================================

/// Default socket path
pub const DEFAULT_SOCKET_PATH: &str = "~/.adhan/adhan.sock";

/// Maximum request size in bytes (4KB)
const MAX_REQUEST_SIZE: usize = 4096;

/// Read timeout in seconds
const READ_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// IpcError
// ============================================================================

/// IPC-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    /// Socket binding error
    #[error("Failed to bind socket: {0}")]
    BindError(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Read error
    #[error("Failed to read request: {0}")]
    ReadError(String),

    /// Write error
    #[error("Failed to write response: {0}")]
    WriteError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,

    /// Request too large
    #[error("Request too large (max {MAX_REQUEST_SIZE} bytes)")]
    RequestTooLarge,
}

// ============================================================================
// IpcServer
// ============================================================================

/// Unix Domain Socket IPC server.
pub struct IpcServer {
    /// Unix socket listener
    listener: UnixListener,
    /// Socket path (for cleanup)
    socket_path: PathBuf,
}

impl IpcServer {
    /// Creates a new IPC server bound to the specified socket path.
    ///
    /// If the socket file already exists, it will be removed before binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be bound.
    pub fn new(socket_path: &Path) -> Result<Self> {
        // Remove existing socket file if present
        if socket_path.exists() {
            std::fs::remove_file(socket_path)
                .with_context(|| format!("Failed to remove existing socket: {:?}", socket_path))?;
        }

        // Ensure parent directory exists
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create socket directory: {:?}", parent))?;
        }

        let listener = UnixListener::bind(socket_path)
            .with_context(|| format!("Failed to bind Unix socket: {:?}", socket_path))?;

        Ok(Self {
            listener,
            socket_path: socket_path.to_path_buf(),
        })
    }

    /// Accepts an incoming client connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be accepted.
    pub async fn accept(&self) -> Result<UnixStream> {
        let (stream, _addr) = self
            .listener
            .accept()
            .await
            .context("Failed to accept connection")?;
        Ok(stream)
    }

    /// Receives and deserializes a command request from the stream.
    ///
    /// Applies a read timeout to prevent blocking indefinitely.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or deserialization fails.
    pub async fn receive_request(stream: &mut UnixStream) -> Result<CommandRequest> {
        let mut buffer = vec![0u8; MAX_REQUEST_SIZE];

        let read_result = timeout(
            Duration::from_secs(READ_TIMEOUT_SECS),
            stream.read(&mut buffer),
        )
        .await;

        let n = match read_result {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => return Err(IpcError::ReadError(e.to_string()).into()),
            Err(_) => return Err(IpcError::Timeout.into()),
        };

        if n == 0 {
            anyhow::bail!("Connection closed by client");
        }

        let request: CommandRequest = serde_json::from_slice(&buffer[..n])
            .with_context(|| "Failed to deserialize command request")?;

        Ok(request)
    }

    /// Serializes and sends a command response to the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub async fn send_response(stream: &mut UnixStream, response: &CommandResponse) -> Result<()> {
        let json = serde_json::to_vec(response).context("Failed to serialize command response")?;

        stream
            .write_all(&json)
            .await
            .context("Failed to write response")?;
        stream.flush().await.context("Failed to flush response")?;

        Ok(())
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        // Clean up socket file on drop
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

// ============================================================================
// RequestHandler
// ============================================================================

/// Handles command requests by dispatching to the PlaybackController.
pub struct RequestHandler {
    /// Shared reference to the playback controller
    controller: Arc<PlaybackController>,
}

impl RequestHandler {
    /// Creates a new request handler with the given controller.
    pub fn new(controller: Arc<PlaybackController>) -> Self {
        Self { controller }
    }

    /// Handles a command request and returns the appropriate response.
    ///
    /// `startPlayback` and `stopPlayback` always answer with the fixed
    /// acknowledgment; internal playback failures are logged here and
    /// discarded. Only unrecognized command names get a non-success answer.
    pub async fn handle(&self, request: CommandRequest) -> CommandResponse {
        match request.decode() {
            PlaybackCommand::Start => self.handle_start(),
            PlaybackCommand::Stop => self.handle_stop(),
            PlaybackCommand::Unknown(name) => {
                warn!(command = %name, "unrecognized command");
                CommandResponse::not_implemented(&name)
            }
        }
    }

    /// Handles the startPlayback command.
    fn handle_start(&self) -> CommandResponse {
        if let Err(e) = self.controller.start() {
            // Fire-and-forget contract: the caller still gets the
            // acknowledgment, the failure stays on this side of the channel.
            warn!("adhan playback failed to start: {}", e);
        }
        CommandResponse::ack("Playback started")
    }

    /// Handles the stopPlayback command.
    fn handle_stop(&self) -> CommandResponse {
        self.controller.stop();
        CommandResponse::ack("Playback stopped")
    }
}

// ============================================================================
// Tests
// ============================================================================
