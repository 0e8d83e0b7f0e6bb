use colored::Colorize;
use tracing::debug;

/// Short-lived status line for mutating actions, written to stderr so it
/// never mixes with JSON on stdout
pub fn notify_success(message: impl std::fmt::Display) {
    debug!("notify success: {}", message);
    eprintln!("{} {}", "✓".green().bold(), message);
}

pub fn notify_error(message: impl std::fmt::Display) {
    debug!("notify error: {}", message);
    eprintln!("{} {}", "✗".red().bold(), message);
}

pub fn notify_info(message: impl std::fmt::Display) {
    debug!("notify info: {}", message);
    eprintln!("{} {}", "•".cyan(), message);
}
