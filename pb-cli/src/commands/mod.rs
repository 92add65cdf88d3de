//! CLI command implementations.

pub mod contacts;
pub mod devices;
pub mod pushes;
pub mod upload;
pub mod user;

use chrono::{DateTime, Utc};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use serde_json::Value;

/// Print a value as pretty JSON.
pub fn print_json(value: &impl serde::Serialize) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// A table with the CLI's standard look.
pub fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

/// String field of a JSON object, or "-" when absent.
pub fn field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "-".to_string(),
    }
}

/// Render a service timestamp (fractional UNIX seconds).
pub fn format_timestamp(value: &Value) -> String {
    value
        .as_f64()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs as i64, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Format a byte count as a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Truncate a string to a maximum number of characters, appending an
/// ellipsis if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_fallbacks() {
        let v = json!({"nickname": "Phone", "empty": "", "active": true, "n": 3});
        assert_eq!(field(&v, "nickname"), "Phone");
        assert_eq!(field(&v, "empty"), "-");
        assert_eq!(field(&v, "active"), "true");
        assert_eq!(field(&v, "n"), "3");
        assert_eq!(field(&v, "missing"), "-");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(&json!(0.0)), "1970-01-01 00:00");
        assert_eq!(format_timestamp(&json!(1_400_000_000.25)), "2014-05-13 16:53");
        assert_eq!(format_timestamp(&json!("soon")), "-");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer body of text", 10), "a longe...");
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
    }
}
