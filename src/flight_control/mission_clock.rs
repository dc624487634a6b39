/// Formats a flight time for the mission clock.
///
/// Negative times render as a countdown `-00:SS`, everything else as `MM:SS` since liftoff.
#[allow(clippy::cast_possible_truncation)]
pub fn format_flight_time(seconds: f64) -> String {
    if seconds < 0.0 {
        return format!("-00:{:02}", seconds.ceil().abs() as i64);
    }
    let min = (seconds / 60.0).floor() as i64;
    let sec = (seconds % 60.0).floor() as i64;
    format!("{min:02}:{sec:02}")
}

#[cfg(test)]
mod tests {
    use super::format_flight_time;

    #[test]
    fn countdown_rounds_towards_liftoff() {
        assert_eq!(format_flight_time(-10.0), "-00:10");
        assert_eq!(format_flight_time(-9.9), "-00:09");
        assert_eq!(format_flight_time(-0.4), "-00:00");
    }

    #[test]
    fn flight_time_is_minutes_and_seconds() {
        assert_eq!(format_flight_time(0.0), "00:00");
        assert_eq!(format_flight_time(8.75), "00:08");
        assert_eq!(format_flight_time(125.2), "02:05");
    }
}
