pub const UNKNOWN: &str = "Unknown";

pub fn categorical(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Integer cells accept decimal text and truncate toward zero; anything else
/// becomes zero.
pub fn integer_or_zero(raw: Option<&str>) -> i64 {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return 0;
    };
    if let Ok(parsed) = value.parse::<i64>() {
        return parsed;
    }
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => parsed.trunc() as i64,
        _ => 0,
    }
}

pub fn float_or_zero(raw: Option<&str>) -> f64 {
    raw.map(str::trim)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Years must be integral. `"2019.0"` is accepted since spreadsheet exports
/// often write whole numbers that way.
pub fn strict_year(raw: Option<&str>) -> Option<i32> {
    let value = raw.map(str::trim).filter(|v| !v.is_empty())?;
    if let Ok(year) = value.parse::<i32>() {
        return Some(year);
    }
    let parsed = value.parse::<f64>().ok()?;
    if parsed.is_finite() && parsed.fract() == 0.0 && parsed.abs() <= f64::from(i32::MAX) {
        Some(parsed as i32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{categorical, float_or_zero, integer_or_zero, strict_year, UNKNOWN};

    #[test]
    fn categorical_trims_and_substitutes_unknown() {
        assert_eq!(categorical(Some("  BJP ")), "BJP");
        assert_eq!(categorical(Some("   ")), UNKNOWN);
        assert_eq!(categorical(None), UNKNOWN);
    }

    #[test]
    fn integers_truncate_decimals_and_zero_garbage() {
        assert_eq!(integer_or_zero(Some("42")), 42);
        assert_eq!(integer_or_zero(Some(" 12.9 ")), 12);
        assert_eq!(integer_or_zero(Some("1,234")), 0);
        assert_eq!(integer_or_zero(Some("NaN")), 0);
        assert_eq!(integer_or_zero(None), 0);
    }

    #[test]
    fn floats_zero_garbage_and_non_finite() {
        assert!((float_or_zero(Some("45.67")) - 45.67).abs() < 1e-9);
        assert_eq!(float_or_zero(Some("inf")), 0.0);
        assert_eq!(float_or_zero(Some("abc")), 0.0);
        assert_eq!(float_or_zero(None), 0.0);
    }

    #[test]
    fn years_must_be_integral() {
        assert_eq!(strict_year(Some("2019")), Some(2019));
        assert_eq!(strict_year(Some("2019.0")), Some(2019));
        assert_eq!(strict_year(Some("2019.5")), None);
        assert_eq!(strict_year(Some("")), None);
        assert_eq!(strict_year(None), None);
    }
}
