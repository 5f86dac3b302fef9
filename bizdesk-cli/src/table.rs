//! Terminal-aware table utilities.

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

/// Create a table sized to `width`, or to the terminal when `None`.
///
/// Falls back to 120 columns when not connected to a TTY.
pub fn new_table(width: Option<u16>) -> Table {
    let width = width.unwrap_or_else(|| {
        crossterm::terminal::size()
            .map(|(w, _)| w)
            .unwrap_or(120)
    });

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_width(width);
    table
}

/// Truncate a string to `max` characters, appending "..." if truncated.
pub fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Format a money amount with thousands separators (`100000` -> `100,000`).
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut out = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if cents != "00" {
        out.push('.');
        out.push_str(cents);
    }
    if value < 0.0 {
        out.insert(0, '-');
    }
    out
}
