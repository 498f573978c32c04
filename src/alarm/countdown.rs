use chrono::Duration;

/// Display string shown once an alarm has run out
pub const EXPIRED_DISPLAY: &str = "00:00";

/// Format a remaining duration as `MM:SS`, or `HH:MM:SS` once it reaches an hour.
/// Fractional seconds are truncated; anything at or below zero shows as `00:00`.
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.num_seconds();
    if remaining <= Duration::zero() || total <= 0 {
        return EXPIRED_DISPLAY.to_string();
    }

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_with_hours() {
        assert_eq!(format_remaining(Duration::seconds(3661)), "01:01:01");
        assert_eq!(format_remaining(Duration::hours(25)), "25:00:00");
    }

    #[test]
    fn test_format_without_hours() {
        assert_eq!(format_remaining(Duration::seconds(59)), "00:59");
        assert_eq!(format_remaining(Duration::seconds(3599)), "59:59");
    }

    #[test]
    fn test_format_truncates_fraction() {
        assert_eq!(format_remaining(Duration::milliseconds(59_999)), "00:59");
        assert_eq!(format_remaining(Duration::milliseconds(400)), "00:00");
    }

    #[test]
    fn test_format_expired() {
        assert_eq!(format_remaining(Duration::zero()), EXPIRED_DISPLAY);
        assert_eq!(format_remaining(Duration::seconds(-5)), EXPIRED_DISPLAY);
    }
}
