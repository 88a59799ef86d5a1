// utils/display.rs

//! # Display Utility Module
//!
//! Terminal output for tfc-plan: a Unicode-styled banner and color-coded
//! messages for errors and successes. Uses the `colored` crate for styling and
//! `unicode_width` so wide characters line up inside the banner.
//!
//! ## Example Usage
//! ```rust
//! use crate::utils::display::print_unicode_box;
//!
//! print_unicode_box("Planning acme/network-prod");
//! print_error!("Failed to connect to the server.");
//! print_success!("Plan written to out.json");
//! ```

use log::debug;
use unicode_width::UnicodeWidthStr;

use crate::core::config::Config;

/// Builds the lines of a Unicode box around `message`, without colors.
fn unicode_box_lines(message: &str) -> Vec<String> {
    let lines: Vec<&str> = message.split('\n').collect();

    // Calculate width using unicode_width to properly account for emojis
    let max_length = lines
        .iter()
        .map(|line| UnicodeWidthStr::width(*line))
        .max()
        .unwrap_or(0);

    let mut boxed = Vec::with_capacity(lines.len() + 2);
    boxed.push(format!("┌{}┐", "─".repeat(max_length + 2)));
    for line in lines {
        let padding = max_length - UnicodeWidthStr::width(line);
        boxed.push(format!("│ {}{} │", line, " ".repeat(padding)));
    }
    boxed.push(format!("└{}┘", "─".repeat(max_length + 2)));
    boxed
}

/// Prints a yellow Unicode-styled message box that correctly handles the width
/// of emojis and other wide characters.
pub fn print_unicode_box(message: &str) {
    let border_color = "\x1b[93m"; // Yellow
    let reset_color = "\x1b[0m";

    for line in unicode_box_lines(message) {
        println!("{}{}{}", border_color, line, reset_color);
    }
}

#[macro_export]
macro_rules! print_error {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        eprintln!("{}", format!($($arg)*).red())
    }};
}

#[macro_export]
macro_rules! print_success {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        println!("{}", format!($($arg)*).green())
    }};
}

/// Log the resolved configuration at debug level. The token is never logged.
pub fn log_config(config: &Config) {
    debug!("Organization: {}", config.workspace.organization);
    debug!("Workspace: {}", config.workspace.name);
    debug!("Address: {}", config.address);
    debug!("Output File: {}", config.options.out.display());
    debug!("Timeout: {}s", config.options.timeout.as_secs());
    debug!("Poll Interval: {}s", config.options.poll_interval.as_secs());
    debug!("Run Message: {}", config.options.message);
}
