//! Human-friendly duration strings used throughout `netgauge.toml`.

use std::time::Duration;

/// Parse a duration string like "5s", "500ms", "1m".
///
/// A bare number is taken as seconds. Returns `None` for anything else.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.trim().parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.trim().parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.trim()
            .parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}
