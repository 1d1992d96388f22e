//! Time formatting helpers.

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cool_down_remainders_read_naturally() {
        assert_eq!(format_duration(1), "1s");
        assert_eq!(format_duration(3540), "59m 0s");
        assert_eq!(format_duration(3601), "1h 0m");
        assert_eq!(format_duration(90_000), "1d 1h");
    }
}
