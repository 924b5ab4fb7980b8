//! Display utilities for the SIM CLI

use colored::Colorize;
use std::fmt::Display;

/// A formatted section title
pub struct SectionTitle(pub &'static str);

impl Display for SectionTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\n{}", self.0.bold().underline())
    }
}

/// Format a section header
pub const fn section_title(title: &'static str) -> SectionTitle {
    SectionTitle(title)
}

/// Format a success message
pub fn success(message: &str) -> String {
    format!("✅ {}", message.green().bold())
}

/// Format an error message
pub fn error(message: &str) -> String {
    format!("❌ {}", message.red().bold())
}

/// Format a key-value list, keys padded to a common width
pub fn key_value_box(items: &[(&str, String)]) -> String {
    let width = items.iter().map(|(key, _)| key.len()).max().unwrap_or(0);

    items
        .iter()
        .map(|(key, value)| format!("  {}  {}", format!("{key:<width$}").bold(), value))
        .collect::<Vec<_>>()
        .join("\n")
}
