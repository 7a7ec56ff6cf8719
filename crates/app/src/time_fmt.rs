/// Below this many seconds the countdown is shown as a warning.
pub const LOW_TIME_SECS: u32 = 300;

/// `m:ss`, minutes unpadded.
#[must_use]
pub fn format_countdown(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[must_use]
pub fn is_low_time(seconds: u32) -> bool {
    seconds < LOW_TIME_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_countdown(1_200), "20:00");
        assert_eq!(format_countdown(65), "1:05");
        assert_eq!(format_countdown(9), "0:09");
        assert_eq!(format_countdown(0), "0:00");
    }

    #[test]
    fn low_time_starts_under_five_minutes() {
        assert!(!is_low_time(300));
        assert!(is_low_time(299));
    }
}
