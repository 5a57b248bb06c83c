//! Shared helper functions for CLI commands
//!
//! Number formatting for the tab-separated reports. Spreadsheets that import
//! them expect floats to always carry a decimal point (`20.0`, not `20`).

/// Format a float the way the spreadsheet templates expect: integral values
/// keep one decimal place, everything else uses the shortest exact form.
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Optional float cell, blank when absent
pub fn format_opt_float(value: Option<f64>) -> String {
    value.map(format_float).unwrap_or_default()
}

/// Optional count cell, blank when absent
pub fn format_opt_count(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Piece lengths as a bracketed list: `[20.0, 15.5]`
pub fn format_lengths(lengths: &[f64]) -> String {
    let items: Vec<String> = lengths.iter().map(|&l| format_float(l)).collect();
    format!("[{}]", items.join(", "))
}

/// Truncate a string to max_len, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
