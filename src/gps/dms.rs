//! Degrees/minutes/seconds to signed decimal degrees.

/// Convert `[degrees, minutes, seconds]` plus a hemisphere reference to a
/// signed decimal degree.
///
/// Returns `None` when fewer than three components are present or any of
/// them is not a finite number; callers treat that the same as "no GPS".
/// References starting with `S` or `W` negate the result.
pub fn dms_to_decimal(components: &[f64], reference: &str) -> Option<f64> {
    let [degrees, minutes, seconds] = match components {
        [d, m, s, ..] => [*d, *m, *s],
        _ => return None,
    };
    if !(degrees.is_finite() && minutes.is_finite() && seconds.is_finite()) {
        return None;
    }

    let decimal = degrees + minutes / 60.0 + seconds / 3600.0;

    if is_negative_hemisphere(reference) {
        Some(-decimal)
    } else {
        Some(decimal)
    }
}

/// Divide an EXIF rational; a zero denominator is unconvertible.
pub fn rational_to_f64(numerator: u32, denominator: u32) -> Option<f64> {
    if denominator == 0 {
        return None;
    }
    Some(f64::from(numerator) / f64::from(denominator))
}

fn is_negative_hemisphere(reference: &str) -> bool {
    // EXIF ASCII values are NUL-terminated and sometimes space padded
    let reference = reference.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    matches!(reference.chars().next(), Some('S' | 's' | 'W' | 'w'))
}
