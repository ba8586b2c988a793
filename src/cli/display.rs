//! Display utilities for the adhan CLI.
//!
//! This module provides formatted output for command results and errors.

use crate::types::CommandResponse;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the result of a start command.
    pub fn show_start_result(response: &CommandResponse) {
        if response.is_ack() {
            println!("> Adhan playback started");
        } else {
            println!("! {}", response.message);
        }
    }

    /// Shows the result of a stop command.
    pub fn show_stop_result(response: &CommandResponse) {
        if response.is_ack() {
            println!("[] Adhan playback stopped");
        } else {
            println!("! {}", response.message);
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }
}
