/// Seconds-per-item factor of the rough ETA shown while a job is processing.
pub const ETA_SECONDS_PER_ITEM: f64 = 30.0;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable size in binary units with at most two decimals:
/// `0 -> "0 Bytes"`, `1024 -> "1 KB"`, `1536 -> "1.5 KB"`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    while unit + 1 < SIZE_UNITS.len() && bytes >= 1024u64.pow(unit as u32 + 1) {
        unit += 1;
    }

    let value = bytes as f64 / 1024f64.powi(unit as i32);
    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZE_UNITS[unit])
}

/// Rounded completion percentage; 0 when `total` is 0.
pub fn progress_percentage(progress: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (progress as f64 / total as f64 * 100.0).round() as u32
}

/// Linear heuristic `(total - progress) / progress * 30`.
///
/// `None` until some progress has been made against a known total.
pub fn estimate_remaining_seconds(progress: u64, total: u64) -> Option<f64> {
    if progress == 0 || total == 0 {
        return None;
    }
    let remaining = total.saturating_sub(progress) as f64;
    Some(remaining / progress as f64 * ETA_SECONDS_PER_ITEM)
}

pub fn format_duration_estimate(seconds: f64) -> String {
    if seconds < 60.0 {
        format!("{} seconds", seconds.round())
    } else if seconds < 3600.0 {
        format!("{} minutes", (seconds / 60.0).round())
    } else {
        format!("{} hours", (seconds / 3600.0).round())
    }
}

/// Share of rows with contacts, rounded; 0 for an empty result set.
pub fn success_rate(with_contacts: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (with_contacts as f64 / total as f64 * 100.0).round() as u32
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
