//! Output formatting for the CLI.

use console::style;
use edge_advisor::{BadgeColor, Severity};
use edge_cache::CacheStatus;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Colored label for a notice severity.
pub fn severity_badge(severity: Severity) -> String {
    let label = severity.to_string().to_uppercase();
    match severity {
        Severity::Info => style(label).blue().to_string(),
        Severity::Warning => style(label).yellow().to_string(),
        Severity::Error => style(label).red().bold().to_string(),
    }
}

/// Colored label for a health badge.
pub fn badge(label: &str, color: BadgeColor) -> String {
    match color {
        BadgeColor::Blue => style(label).blue().to_string(),
        BadgeColor::Orange => style(label).yellow().to_string(),
        BadgeColor::Red => style(label).red().to_string(),
    }
}

/// Colored cache status.
pub fn cache_badge(status: CacheStatus) -> String {
    match status {
        CacheStatus::Hit => style(status).green().to_string(),
        CacheStatus::Miss => style(status).yellow().to_string(),
        CacheStatus::Bypass => style(status).dim().to_string(),
        CacheStatus::Error => style(status).red().to_string(),
    }
}

/// Render a rank as a ten-cell gauge, e.g. `[###-------]`.
pub fn rank_gauge(rank: u8) -> String {
    let filled = usize::from(rank.min(10));
    format!("[{}{}]", "#".repeat(filled), "-".repeat(10 - filled))
}
