const SIZE_UNITS: [&str; 7] = ["B", "KB", "MB", "GB", "TB", "PB", "EB"];
const STEP: f64 = 1024.0;

/// Picks the unit that keeps the magnitude below 1024, after rounding to two
/// decimals.
fn scale(bytes: u64) -> (f64, usize) {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= STEP && unit < SIZE_UNITS.len() - 1 {
        value /= STEP;
        unit += 1;
    }
    // 1023.996 KB would print as 1024 KB
    if round2(value) >= STEP && unit < SIZE_UNITS.len() - 1 {
        value /= STEP;
        unit += 1;
    }
    (value, unit)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn trim_decimals(value: f64) -> String {
    let text = format!("{:.2}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let (value, unit) = scale(bytes);
    format!("{} {}", trim_decimals(value), SIZE_UNITS[unit])
}

pub fn format_speed(bytes_per_sec: u64) -> String {
    if bytes_per_sec == 0 {
        return "0 B/s".to_string();
    }
    let (value, unit) = scale(bytes_per_sec);
    format!("{} {}/s", trim_decimals(value), SIZE_UNITS[unit])
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Names come from a remote server; control characters would drive the
/// terminal, so they are printed escaped.
pub fn escape_display(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_control() {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    out
}
