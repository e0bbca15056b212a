#![forbid(unsafe_code)]

//! Clock-style formatting of the spent-time counter.

/// Format a second count as `HH:MM:SS`.
///
/// Hours are not capped at 24; a marathon run shows `125:00:01`.
#[must_use]
pub fn format_clock(total_secs: u32) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let secs = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero() {
        assert_eq!(format_clock(0), "00:00:00");
    }

    #[test]
    fn seconds_and_minutes() {
        assert_eq!(format_clock(59), "00:00:59");
        assert_eq!(format_clock(60), "00:01:00");
        assert_eq!(format_clock(61), "00:01:01");
    }

    #[test]
    fn hours_do_not_leak_into_minutes() {
        assert_eq!(format_clock(3661), "01:01:01");
        assert_eq!(format_clock(7325), "02:02:05");
    }

    #[test]
    fn uncapped_hours() {
        assert_eq!(format_clock(450_001), "125:00:01");
    }
}
