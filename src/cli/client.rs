//! IPC client for communicating with the adhan playback daemon.
//!
//! This module provides:
//! - Unix Domain Socket client
//! - Request/response handling
//! - Connection retry logic
//! - Timeout handling

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::time::timeout;

use crate::types::{CommandRequest, CommandResponse, PlaybackCommand};

// ============================================================================
// Constants
// ============================================================================

/// Default socket path, relative to the home directory
const DEFAULT_SOCKET_PATH: &str = ".adhan/adhan.sock";

/// Connection timeout in seconds
const CONNECTION_TIMEOUT_SECS: u64 = 5;

/// Read/write timeout in seconds
const IO_TIMEOUT_SECS: u64 = 5;

/// Maximum response size in bytes (64KB)
const MAX_RESPONSE_SIZE: usize = 65536;

/// Maximum retry attempts
const MAX_RETRIES: u32 = 3;

/// Retry delay in milliseconds (base delay, multiplied by attempt number)
const RETRY_DELAY_MS: u64 = 500;

// ============================================================================
// IpcClient
// ============================================================================

/// IPC client for daemon communication.
pub struct IpcClient {
    /// Socket path
    socket_path: PathBuf,
    /// Connection timeout
    timeout: Duration,
}

impl IpcClient {
    /// Creates a new IPC client with the default socket path.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        let socket_path = Self::default_socket_path()?;
        Ok(Self {
            socket_path,
            timeout: Duration::from_secs(CONNECTION_TIMEOUT_SECS),
        })
    }

    /// Creates a new IPC client with a custom socket path.
    #[must_use]
    pub fn with_socket_path(socket_path: PathBuf) -> Self {
        Self {
            socket_path,
            timeout: Duration::from_secs(CONNECTION_TIMEOUT_SECS),
        }
    }

    /// Returns the default socket path.
    fn default_socket_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine the home directory")?;
        Ok(home.join(DEFAULT_SOCKET_PATH))
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &PathBuf {
        &self.socket_path
    }

    /// Sends the startPlayback command to the daemon.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon is unreachable.
    pub async fn start(&self) -> Result<CommandResponse> {
        self.send_request_with_retry(&CommandRequest::new(&PlaybackCommand::Start))
            .await
    }

    /// Sends the stopPlayback command to the daemon.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon is unreachable.
    pub async fn stop(&self) -> Result<CommandResponse> {
        self.send_request_with_retry(&CommandRequest::new(&PlaybackCommand::Stop))
            .await
    }

    /// Sends a request to the daemon with retry logic.
    async fn send_request_with_retry(&self, request: &CommandRequest) -> Result<CommandResponse> {
        let mut last_error = None;

        for attempt in 1..=MAX_RETRIES {
            match self.send_request(request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    tracing::warn!("request failed (attempt {}/{}): {}", attempt, MAX_RETRIES, e);
                    last_error = Some(e);

                    if attempt < MAX_RETRIES {
                        let delay = Duration::from_millis(RETRY_DELAY_MS * u64::from(attempt));
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap())
    }

    /// Sends a single request to the daemon.
    async fn send_request(&self, request: &CommandRequest) -> Result<CommandResponse> {
        // Connect with timeout
        let mut stream = timeout(self.timeout, UnixStream::connect(&self.socket_path))
            .await
            .context("Connection timed out")?
            .context("Could not connect to the daemon. Start it with 'adhan daemon'")?;

        // Serialize request
        let request_json =
            serde_json::to_string(request).context("Failed to serialize request")?;

        // Send request with timeout
        timeout(
            Duration::from_secs(IO_TIMEOUT_SECS),
            stream.write_all(request_json.as_bytes()),
        )
        .await
        .context("Write timed out")?
        .context("Failed to send request")?;

        // Flush
        timeout(Duration::from_secs(IO_TIMEOUT_SECS), stream.flush())
            .await
            .context("Flush timed out")?
            .context("Failed to flush request")?;

        // Shutdown write side to signal end of request
        stream
            .shutdown()
            .await
            .context("Failed to shut down the write side")?;

        // Read response with timeout
        let mut buffer = vec![0u8; MAX_RESPONSE_SIZE];
        let n = timeout(
            Duration::from_secs(IO_TIMEOUT_SECS),
            stream.read(&mut buffer),
        )
        .await
        .context("Read timed out")?
        .context("Failed to receive response")?;

        if n == 0 {
            anyhow::bail!("The daemon closed the connection without answering");
        }

        // Deserialize response
        let response: CommandResponse =
            serde_json::from_slice(&buffer[..n]).context("Failed to parse response")?;

        Ok(response)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::UnixListener;

    // ------------------------------------------------------------------------
    // Helper functions
    // ------------------------------------------------------------------------

    fn create_temp_socket_path() -> PathBuf {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sock");
        // Keep the directory so it's not deleted
        std::mem::forget(dir);
        path
    }

    /// Accepts one connection and answers every request with an ack.
    async fn serve_one_ack(listener: UnixListener) {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buffer = vec![0u8; 4096];
        let n = stream.read(&mut buffer).await.unwrap();
        let _request: CommandRequest = serde_json::from_slice(&buffer[..n]).unwrap();

        let response = CommandResponse::ack("ok");
        let json = serde_json::to_vec(&response).unwrap();
        stream.write_all(&json).await.unwrap();
        stream.flush().await.unwrap();
    }

    // ------------------------------------------------------------------------
    // Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_with_socket_path() {
        let path = PathBuf::from("/tmp/custom.sock");
        let client = IpcClient::with_socket_path(path.clone());
        assert_eq!(client.socket_path(), &path);
    }

    #[tokio::test]
    async fn test_start_round_trip() {
        let socket_path = create_temp_socket_path();
        let listener = UnixListener::bind(&socket_path).unwrap();
        let server = tokio::spawn(serve_one_ack(listener));

        let client = IpcClient::with_socket_path(socket_path);
        let response = client.start().await.unwrap();

        assert!(response.is_ack());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_round_trip() {
        let socket_path = create_temp_socket_path();
        let listener = UnixListener::bind(&socket_path).unwrap();
        let server = tokio::spawn(serve_one_ack(listener));

        let client = IpcClient::with_socket_path(socket_path);
        let response = client.stop().await.unwrap();

        assert!(response.is_ack());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connection_error_when_no_daemon() {
        let socket_path = create_temp_socket_path();
        let client = IpcClient::with_socket_path(socket_path);

        // No daemon listening; all retries fail.
        let result = client.stop().await;
        assert!(result.is_err());
    }
}
