//! CLI output formatting with colors and styling.
//!
//! Respects NO_COLOR and FORCE_COLOR environment variables.

use colored::{ColoredString, Colorize};

/// Initialize color support based on environment.
/// Call once at startup.
pub fn init() {
    // colored handles NO_COLOR on its own; FORCE_COLOR is ours.
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    } else if std::env::var("FORCE_COLOR").is_ok() {
        colored::control::set_override(true);
    }
}

pub fn title(name: &str) -> ColoredString {
    name.bold()
}

pub fn banner(text: &str) -> String {
    format!(
        "{} {} {}",
        "====================".dimmed(),
        text.bold(),
        "====================".dimmed()
    )
}

pub fn menu_key(key: &str) -> ColoredString {
    key.green().bold()
}

pub fn prompt() -> ColoredString {
    ">".cyan().bold()
}

pub fn error_label() -> ColoredString {
    "error".red().bold()
}
