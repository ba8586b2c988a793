//! Daemon module for adhan playback.
//!
//! This module contains the daemon functionality:
//! - `ipc`: Unix socket server and command dispatch

pub mod ipc;

pub use ipc::{IpcServer, RequestHandler, DEFAULT_SOCKET_PATH};

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::playback::PlaybackController;

/// Runs the daemon accept loop until a shutdown signal arrives.
///
/// Each connection carries one request/response pair. On shutdown the
/// controller is stopped unconditionally, so no audio session outlives the
/// daemon.
///
/// # Errors
///
/// Returns an error if the socket cannot be bound.
pub async fn run(socket_path: &Path, controller: Arc<PlaybackController>) -> Result<()> {
    let server = IpcServer::new(socket_path)?;
    let handler = RequestHandler::new(Arc::clone(&controller));
    info!(socket = %socket_path.display(), "adhan daemon listening");

    loop {
        tokio::select! {
            accepted = server.accept() => {
                match accepted {
                    Ok(mut stream) => {
                        match IpcServer::receive_request(&mut stream).await {
                            Ok(request) => {
                                let response = handler.handle(request).await;
                                if let Err(e) = IpcServer::send_response(&mut stream, &response).await {
                                    warn!("failed to send response: {}", e);
                                }
                            }
                            Err(e) => warn!("failed to read request: {}", e),
                        }
                    }
                    Err(e) => warn!("failed to accept connection: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    controller.stop();
    Ok(())
}
