//! Command definitions for the adhan CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

// ============================================================================
// CLI Structure
// ============================================================================

/// Adhan playback CLI - start and stop the call to prayer
#[derive(Parser, Debug)]
#[command(
    name = "adhan",
    version,
    about = "Adhan playback daemon and CLI",
    long_about = "Plays the bundled adhan recording with alarm-category audio routing.\n\
                  Run `adhan daemon` in the background, then drive it with\n\
                  `adhan start` and `adhan stop`.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Override the daemon socket path
    #[arg(short, long, global = true)]
    pub socket: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start adhan playback (interrupts any playback in progress)
    Start,

    /// Stop adhan playback and release the audio session
    Stop,

    /// Run the playback daemon in the foreground
    Daemon,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_args() {
        let cli = Cli::parse_from(["adhan"]);
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_verbose_flag() {
        let cli = Cli::parse_from(["adhan", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_parse_start_command() {
        let cli = Cli::parse_from(["adhan", "start"]);
        assert!(matches!(cli.command, Some(Commands::Start)));
    }

    #[test]
    fn test_parse_stop_command() {
        let cli = Cli::parse_from(["adhan", "stop"]);
        assert!(matches!(cli.command, Some(Commands::Stop)));
    }

    #[test]
    fn test_parse_daemon_command() {
        let cli = Cli::parse_from(["adhan", "daemon"]);
        assert!(matches!(cli.command, Some(Commands::Daemon)));
    }

    #[test]
    fn test_parse_socket_override() {
        let cli = Cli::parse_from(["adhan", "--socket", "/tmp/test.sock", "start"]);
        assert_eq!(cli.socket, Some(PathBuf::from("/tmp/test.sock")));
    }

    #[test]
    fn test_parse_completions() {
        let cli = Cli::parse_from(["adhan", "completions", "bash"]);
        assert!(matches!(cli.command, Some(Commands::Completions { .. })));
    }
}
