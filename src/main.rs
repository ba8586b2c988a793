//! Adhan playback daemon and CLI.
//!
//! Plays the bundled adhan recording with alarm-category audio routing:
//! - `adhan daemon` serves the playback command channel
//! - `adhan start` / `adhan stop` drive it

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use adhan::cli::{Cli, Commands, Display, IpcClient};
use adhan::playback::{PlaybackController, RodioBackend};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse();

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Start) => {
            let client = make_client(cli.socket)?;
            let response = client.start().await?;
            Display::show_start_result(&response);
        }
        Some(Commands::Stop) => {
            let client = make_client(cli.socket)?;
            let response = client.stop().await?;
            Display::show_stop_result(&response);
        }
        Some(Commands::Daemon) => {
            let socket_path = match cli.socket {
                Some(path) => path,
                None => default_socket_path()?,
            };
            let controller = Arc::new(PlaybackController::new(Box::new(RodioBackend::new())));
            adhan::daemon::run(&socket_path, controller).await?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Creates an IPC client, honoring the socket override.
fn make_client(socket: Option<PathBuf>) -> Result<IpcClient> {
    match socket {
        Some(path) => Ok(IpcClient::with_socket_path(path)),
        None => IpcClient::new(),
    }
}

/// Returns the default daemon socket path under the home directory.
fn default_socket_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine the home directory")?;
    Ok(home.join(".adhan").join("adhan.sock"))
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["adhan"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_start() {
        let cli = Cli::parse_from(["adhan", "start"]);
        assert!(matches!(cli.command, Some(Commands::Start)));
    }

    #[test]
    fn test_cli_parse_stop() {
        let cli = Cli::parse_from(["adhan", "stop"]);
        assert!(matches!(cli.command, Some(Commands::Stop)));
    }

    #[test]
    fn test_cli_parse_daemon_with_socket() {
        let cli = Cli::parse_from(["adhan", "daemon", "--socket", "/tmp/a.sock"]);
        assert!(matches!(cli.command, Some(Commands::Daemon)));
        assert_eq!(cli.socket, Some(PathBuf::from("/tmp/a.sock")));
    }

    #[test]
    fn test_make_client_with_override() {
        let client = make_client(Some(PathBuf::from("/tmp/x.sock"))).unwrap();
        assert_eq!(client.socket_path(), &PathBuf::from("/tmp/x.sock"));
    }
}
