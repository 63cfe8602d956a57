//! Serving-size parsing.
//!
//! Upstream serving sizes are free text ("100g", "1 cup", "250", "3.5 oz",
//! "1 cup (240 ml)"). Parsing never fails: a string that does not fit the
//! `<number><unit>` shape yields its first number, and a string without any
//! number yields nothing but the original text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static FULL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+(?:[.,][0-9]+)?|[.,][0-9]+)\s*(\p{L}+)?$").unwrap()
});

// A leading separator (".5") is a fraction, not a dropped digit
static NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+(?:[.,][0-9]+)?|[.,][0-9]+").unwrap());

/// Parsed serving size.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServingSizeInfo {
    /// Leading quantity
    pub quantity: Option<f64>,
    /// Unit letters following the quantity
    pub unit: Option<String>,
    /// The string as received
    pub original: Option<String>,
}

/// Parse a free-form serving size.
///
/// # Example
///
/// ```
/// use foodsearch_engine::parse_serving_size;
///
/// let info = parse_serving_size(Some("1 cup"));
/// assert_eq!(info.quantity, Some(1.0));
/// assert_eq!(info.unit.as_deref(), Some("cup"));
/// ```
pub fn parse_serving_size(raw: Option<&str>) -> ServingSizeInfo {
    let Some(raw) = raw else {
        return ServingSizeInfo::default();
    };
    let original = Some(raw.to_string());
    let trimmed = raw.trim();

    if let Some(caps) = FULL_PATTERN.captures(trimmed) {
        return ServingSizeInfo {
            quantity: caps.get(1).and_then(|m| parse_number(m.as_str())),
            unit: caps.get(2).map(|m| m.as_str().to_string()),
            original,
        };
    }

    ServingSizeInfo {
        quantity: NUMBER_PATTERN
            .find(trimmed)
            .and_then(|m| parse_number(m.as_str())),
        unit: None,
        original,
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let text = text.replace(',', ".");
    if text.starts_with('.') {
        format!("0{text}").parse().ok()
    } else {
        text.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_and_unit() {
        let info = parse_serving_size(Some("250g"));
        assert_eq!(info.quantity, Some(250.0));
        assert_eq!(info.unit.as_deref(), Some("g"));
        assert_eq!(info.original.as_deref(), Some("250g"));
    }

    #[test]
    fn test_spaced_unit() {
        let info = parse_serving_size(Some("1 cup"));
        assert_eq!(info.quantity, Some(1.0));
        assert_eq!(info.unit.as_deref(), Some("cup"));
    }

    #[test]
    fn test_decimal_quantity() {
        let info = parse_serving_size(Some("  3.5 oz "));
        assert_eq!(info.quantity, Some(3.5));
        assert_eq!(info.unit.as_deref(), Some("oz"));
        assert_eq!(info.original.as_deref(), Some("  3.5 oz "));
    }

    #[test]
    fn test_comma_decimal_quantity() {
        let info = parse_serving_size(Some("3,5 oz"));
        assert_eq!(info.quantity, Some(3.5));
        assert_eq!(info.unit.as_deref(), Some("oz"));
    }

    #[test]
    fn test_bare_number() {
        let info = parse_serving_size(Some("250"));
        assert_eq!(info.quantity, Some(250.0));
        assert_eq!(info.unit, None);
    }

    #[test]
    fn test_extended_latin_unit() {
        let info = parse_serving_size(Some("2 cuillères"));
        assert_eq!(info.quantity, Some(2.0));
        assert_eq!(info.unit.as_deref(), Some("cuillères"));
    }

    #[test]
    fn test_leading_decimal_point() {
        let info = parse_serving_size(Some(".5 cup"));
        assert_eq!(info.quantity, Some(0.5));
        assert_eq!(info.unit.as_deref(), Some("cup"));

        assert_eq!(parse_serving_size(Some(",25")).quantity, Some(0.25));
    }

    #[test]
    fn test_symbols_are_not_units() {
        let info = parse_serving_size(Some("2×"));
        assert_eq!(info.quantity, Some(2.0));
        assert_eq!(info.unit, None);

        let info = parse_serving_size(Some("6÷"));
        assert_eq!(info.quantity, Some(6.0));
        assert_eq!(info.unit, None);
    }

    #[test]
    fn test_non_latin_unit() {
        let info = parse_serving_size(Some("200 мл"));
        assert_eq!(info.quantity, Some(200.0));
        assert_eq!(info.unit.as_deref(), Some("мл"));
    }

    #[test]
    fn test_fallback_takes_first_number() {
        let info = parse_serving_size(Some("1 cup (240 ml)"));
        assert_eq!(info.quantity, Some(1.0));
        assert_eq!(info.unit, None);

        let info = parse_serving_size(Some("about 30 g"));
        assert_eq!(info.quantity, Some(30.0));
        assert_eq!(info.unit, None);
    }

    #[test]
    fn test_no_number() {
        let info = parse_serving_size(Some("approx"));
        assert_eq!(info.quantity, None);
        assert_eq!(info.unit, None);
        assert_eq!(info.original.as_deref(), Some("approx"));
    }

    #[test]
    fn test_absent() {
        assert_eq!(parse_serving_size(None), ServingSizeInfo::default());
        assert_eq!(parse_serving_size(Some("")).quantity, None);
    }
}
