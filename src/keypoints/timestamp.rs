/// Parse an "MM:SS" key point timestamp into milliseconds.
///
/// Only the first two `:`-separated parts are read, each as its leading
/// decimal digits after an optional `+`. Missing or malformed input yields 0.
pub fn parse_timestamp(timestamp: &str) -> u64 {
    if !timestamp.contains(':') {
        return 0;
    }

    let mut parts = timestamp.split(':');
    let minutes = parts.next().and_then(leading_number);
    let seconds = parts.next().and_then(leading_number);

    match (minutes, seconds) {
        (Some(minutes), Some(seconds)) => minutes
            .saturating_mul(60)
            .saturating_add(seconds)
            .saturating_mul(1000),
        _ => 0,
    }
}

fn leading_number(part: &str) -> Option<u64> {
    let trimmed = part.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..digits_end].parse().ok()
}

/// Format milliseconds back to "MM:SS" (minutes are not wrapped into hours).
pub fn format_timestamp(ms: u64) -> String {
    let total_seconds = ms / 1000;
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}
