use crate::error::GradeError;

/// Markers that mean "no valid swim" wherever they appear (case-insensitive).
const RESERVED_MARKERS: [&str; 4] = ["DQ", "NS", "DNF", "SCR"];

/// Course annotations exports append to times (`58.42Y`, `1:02.34L`).
const COURSE_MARKERS: [char; 3] = ['Y', 'L', 'S'];

/// Parse a display time into canonical seconds.
///
/// Accepted shapes: `SS.hh`, `M:SS.hh`, `H:MM:SS.hh`, each optionally followed
/// by course markers. Anything else is `InvalidTime`; this never panics.
pub fn parse_time(text: &str) -> Result<f64, GradeError> {
    let invalid = || GradeError::InvalidTime(text.to_string());

    let upper = text.trim().to_ascii_uppercase();
    if upper.is_empty() || !upper.chars().any(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if RESERVED_MARKERS.iter().any(|m| upper.contains(m)) {
        return Err(invalid());
    }

    let body = upper
        .trim_end_matches(|c: char| COURSE_MARKERS.contains(&c) || c.is_whitespace())
        .trim();

    let mut parts = Vec::with_capacity(3);
    for fragment in body.split(':') {
        let value = fragment.trim().parse::<f64>().map_err(|_| invalid())?;
        if !value.is_finite() || value < 0.0 {
            return Err(invalid());
        }
        parts.push(value);
    }

    let seconds = match parts.as_slice() {
        [s] => *s,
        [m, s] => m * 60.0 + s,
        [h, m, s] => h * 3600.0 + m * 60.0 + s,
        _ => return Err(invalid()),
    };

    parse_seconds(seconds).map_err(|_| invalid())
}

/// Validate an already-numeric time.
pub fn parse_seconds(value: f64) -> Result<f64, GradeError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(GradeError::InvalidTime(value.to_string()))
    }
}

/// Render seconds the way meet results print them, to the hundredth.
///
/// `58.42`, `1:02.34`, `1:02:03.45`. Invalid inputs render as `-`.
pub fn format_time(seconds: f64) -> String {
    if !(seconds.is_finite() && seconds >= 0.0) {
        return "-".to_string();
    }

    let total = (seconds * 100.0).round() as u64;
    let hundredths = total % 100;
    let whole = total / 100;
    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}.{hundredths:02}")
    } else if minutes > 0 {
        format!("{minutes}:{secs:02}.{hundredths:02}")
    } else {
        format!("{secs}.{hundredths:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn parses_plain_and_colon_forms() {
        assert!((parse_time("58.42").unwrap() - 58.42).abs() < 1e-9);
        assert!((parse_time("1:02.34").unwrap() - 62.34).abs() < 1e-9);
        assert!((parse_time("1:02:03.45").unwrap() - 3723.45).abs() < 1e-9);
    }

    #[test]
    fn strips_course_suffix() {
        assert!((parse_time("1:02.34Y").unwrap() - 62.34).abs() < 1e-9);
        assert!((parse_time(" 27.10 l ").unwrap() - 27.10).abs() < 1e-9);
        assert!((parse_time("5:10.00S").unwrap() - 310.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_markers_and_garbage() {
        for bad in ["DQ", "dq 1:02.34", "NS", "DNS", "1:02.34 DNF", "", "   ", "NT", "1:2:3:4", "1::2", "abc1", "-5.0"] {
            assert!(
                matches!(parse_time(bad), Err(GradeError::InvalidTime(_))),
                "expected InvalidTime for {bad:?}"
            );
        }
    }

    #[test]
    fn numeric_seconds_must_be_finite_and_non_negative() {
        assert_eq!(parse_seconds(55.0).unwrap(), 55.0);
        assert!(parse_seconds(f64::NAN).is_err());
        assert!(parse_seconds(-1.0).is_err());
    }

    #[test]
    fn formats_like_meet_results() {
        assert_eq!(format_time(58.42), "58.42");
        assert_eq!(format_time(62.34), "1:02.34");
        assert_eq!(format_time(3723.45), "1:02:03.45");
        assert_eq!(format_time(5.0), "5.00");
        assert_eq!(format_time(f64::NAN), "-");
    }

    #[test]
    fn format_then_parse_round_trips() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2_000 {
            let s: f64 = rng.gen_range(0.0..10_000.0);
            let back = parse_time(&format_time(s)).unwrap();
            assert!((back - s).abs() <= 0.005 + 1e-9, "{s} -> {} -> {back}", format_time(s));
        }
    }
}
