//! Playback time labels

/// Format seconds as `m:ss`.
///
/// Minutes are not rolled into hours. Negative and non-finite input reads as
/// zero, since the media element reports `NaN` before metadata arrives.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}
