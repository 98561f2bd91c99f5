//! Decoders for individual deck columns.

/// Decode a tenths-of-a-degree coordinate token with hemisphere suffix.
///
/// `"135N"` is 13.5, `"1234W"` is -123.4. The numeric part must be plain
/// digits and the suffix one of `N`, `S`, `E`, `W` (case-insensitive).
pub fn parse_coordinate(token: &str) -> Option<f64> {
    let token = token.trim();
    if token.len() < 2 || !token.is_ascii() {
        return None;
    }

    let (digits, hemisphere) = token.split_at(token.len() - 1);
    let sign = match hemisphere.to_ascii_uppercase().as_str() {
        "N" | "E" => 1.0,
        "S" | "W" => -1.0,
        _ => return None,
    };

    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let tenths: u32 = digits.parse().ok()?;
    Some(sign * tenths as f64 / 10.0)
}

/// Normalize the storm number column to two characters.
pub fn parse_storm_number(field: &str) -> String {
    let field = field.trim();
    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (None, _) => "00".to_string(),
        (Some(c), None) => format!("0{}", c),
        (Some(a), Some(b)) => [a, b].iter().collect(),
    }
}

/// Decode an optional wind or pressure column.
///
/// Non-positive values are deck placeholders for "missing".
pub fn parse_intensity(field: Option<&str>) -> Option<u32> {
    let value: i64 = field?.trim().parse().ok()?;
    if value > 0 {
        u32::try_from(value).ok()
    } else {
        None
    }
}

/// Decode the tau column, defaulting to 0.
pub fn parse_tau(field: Option<&str>) -> i32 {
    field
        .and_then(|f| f.trim().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_hemispheres() {
        assert_eq!(parse_coordinate("135N"), Some(13.5));
        assert_eq!(parse_coordinate("1234W"), Some(-123.4));
        assert_eq!(parse_coordinate("1304E"), Some(130.4));
        assert_eq!(parse_coordinate("52S"), Some(-5.2));
        assert_eq!(parse_coordinate("0N"), Some(0.0));
        assert_eq!(parse_coordinate(" 125n "), Some(12.5));
    }

    #[test]
    fn test_coordinate_rejects_bad_tokens() {
        assert_eq!(parse_coordinate("135"), None);
        assert_eq!(parse_coordinate("N"), None);
        assert_eq!(parse_coordinate(""), None);
        assert_eq!(parse_coordinate("13.5N"), None);
        assert_eq!(parse_coordinate("-135N"), None);
        assert_eq!(parse_coordinate("135X"), None);
    }

    #[test]
    fn test_storm_number_padding() {
        assert_eq!(parse_storm_number("1"), "01");
        assert_eq!(parse_storm_number(" 07 "), "07");
        assert_eq!(parse_storm_number("123"), "12");
        assert_eq!(parse_storm_number(""), "00");
    }

    #[test]
    fn test_intensity_non_positive_is_absent() {
        assert_eq!(parse_intensity(Some(" 65")), Some(65));
        assert_eq!(parse_intensity(Some("0")), None);
        assert_eq!(parse_intensity(Some("-999")), None);
        assert_eq!(parse_intensity(Some("abc")), None);
        assert_eq!(parse_intensity(None), None);
    }

    #[test]
    fn test_tau_defaults_to_zero() {
        assert_eq!(parse_tau(Some(" 72")), 72);
        assert_eq!(parse_tau(Some("")), 0);
        assert_eq!(parse_tau(Some("x")), 0);
        assert_eq!(parse_tau(None), 0);
    }
}
