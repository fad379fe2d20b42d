/// `"X.X km"` from one kilometer up, whole meters below.
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{} m", meters.round())
    }
}

/// `"H hr M min"` from one hour up, `"M min"` below. Partial minutes are
/// truncated.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_duration(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;

    if hours > 0 {
        format!("{hours} hr {minutes} min")
    } else {
        format!("{minutes} min")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(12.4), "12 m");
        assert_eq!(format_distance(999.4), "999 m");
        assert_eq!(format_distance(1000.0), "1.0 km");
        assert_eq!(format_distance(12_345.0), "12.3 km");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(0.0), "0 min");
        assert_eq!(format_duration(59.9), "0 min");
        assert_eq!(format_duration(61.0), "1 min");
        assert_eq!(format_duration(3599.0), "59 min");
        assert_eq!(format_duration(3600.0), "1 hr 0 min");
        assert_eq!(format_duration(5430.0), "1 hr 30 min");
    }

    #[test]
    fn invalid_durations_render_as_zero() {
        assert_eq!(format_duration(-5.0), "0 min");
        assert_eq!(format_duration(f64::NAN), "0 min");
    }
}
