//! Lenient field deserializers
//!
//! Venue descriptors arrive from HTML forms and hand-written JSON, so
//! capacities may be numbers, numeric strings ("25 mesas") or garbage, and
//! flags may be `true`, `"si"` or `"1"`. These helpers never reject a scalar:
//! anything they cannot interpret becomes `None` / `false` and the calculator
//! falls back to its defaults.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Fold a free-form tag to its canonical shape: trimmed, lowercase,
/// accents removed, spaces and hyphens as underscores.
pub fn normalize_tag(raw: &str) -> String {
    raw.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            ' ' | '-' => '_',
            other => other,
        })
        .collect()
}

/// Parse the leading integer of a string the way form inputs are read:
/// `"25"` and `"25 mesas"` give 25, `"12.7"` gives 12.
///
/// Zero, negative and non-numeric values yield `None`.
pub fn parse_count(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = unsigned.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    // All-digit input can only fail to parse by overflowing.
    let value = digits.parse::<u32>().unwrap_or(u32::MAX);
    (value > 0).then_some(value)
}

/// Interpret a yes/no style answer. Only affirmative spellings count.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        normalize_tag(raw).as_str(),
        "si" | "s" | "yes" | "y" | "true" | "1" | "on"
    )
}

/// Deserialize a positive count, coercing anything unusable to `None`.
pub fn count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawScalar>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawScalar::Int(n)) if n > 0 => Some(u32::try_from(n).unwrap_or(u32::MAX)),
        // `as` saturates, so huge values land in the top tier.
        Some(RawScalar::Float(f)) if f.is_finite() && f >= 1.0 => Some(f as u32),
        Some(RawScalar::Text(s)) => parse_count(&s),
        _ => None,
    })
}

/// Deserialize a boolean-ish flag. Missing or unrecognized values are `false`.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawScalar>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawScalar::Bool(b)) => b,
        Some(RawScalar::Int(n)) => n != 0,
        Some(RawScalar::Text(s)) => parse_flag(&s),
        _ => false,
    })
}

/// Deserialize any scalar as text. Numbers are rendered as written
/// (a star rating of `4` becomes `"4"`); blank strings count as absent.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawScalar>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawScalar::Text(s)) if !s.trim().is_empty() => Some(s),
        Some(RawScalar::Int(n)) => Some(n.to_string()),
        Some(RawScalar::Float(f)) => Some(f.to_string()),
        Some(RawScalar::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "count")]
        n: Option<u32>,
        #[serde(default, deserialize_with = "flag")]
        f: bool,
        #[serde(default, deserialize_with = "text")]
        t: Option<String>,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn normalize_folds_case_accents_and_spaces() {
        assert_eq!(normalize_tag("  Parque Acuático "), "parque_acuatico");
        assert_eq!(normalize_tag("Centro-Nocturno"), "centro_nocturno");
        assert_eq!(normalize_tag("Sí"), "si");
    }

    #[test]
    fn parse_count_takes_leading_integer() {
        assert_eq!(parse_count("25"), Some(25));
        assert_eq!(parse_count("25 mesas"), Some(25));
        assert_eq!(parse_count("12.7"), Some(12));
        assert_eq!(parse_count("+8"), Some(8));
    }

    #[test]
    fn parse_count_rejects_unusable_input() {
        assert_eq!(parse_count("muchas"), None);
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("0"), None);
        assert_eq!(parse_count("-5"), None);
    }

    #[test]
    fn parse_count_saturates_on_overflow() {
        assert_eq!(parse_count("99999999999999"), Some(u32::MAX));
    }

    #[test]
    fn count_accepts_numbers_and_strings() {
        assert_eq!(probe(r#"{"n": 40}"#).n, Some(40));
        assert_eq!(probe(r#"{"n": "41"}"#).n, Some(41));
        assert_eq!(probe(r#"{"n": 3.9}"#).n, Some(3));
    }

    #[test]
    fn count_coerces_garbage_to_none() {
        assert_eq!(probe(r#"{"n": "abc"}"#).n, None);
        assert_eq!(probe(r#"{"n": null}"#).n, None);
        assert_eq!(probe(r#"{"n": -3}"#).n, None);
        assert_eq!(probe(r#"{"n": [1, 2]}"#).n, None);
        assert_eq!(probe(r#"{"n": {"a": 1}}"#).n, None);
        assert_eq!(probe(r#"{}"#).n, None);
    }

    #[test]
    fn flag_understands_spanish_answers() {
        assert!(probe(r#"{"f": "si"}"#).f);
        assert!(probe(r#"{"f": "Sí"}"#).f);
        assert!(probe(r#"{"f": true}"#).f);
        assert!(probe(r#"{"f": 1}"#).f);
        assert!(!probe(r#"{"f": "no"}"#).f);
        assert!(!probe(r#"{"f": "tal vez"}"#).f);
        assert!(!probe(r#"{}"#).f);
    }

    #[test]
    fn text_renders_numbers_and_drops_blanks() {
        assert_eq!(probe(r#"{"t": 4}"#).t.as_deref(), Some("4"));
        assert_eq!(probe(r#"{"t": "cdmx"}"#).t.as_deref(), Some("cdmx"));
        assert_eq!(probe(r#"{"t": "   "}"#).t, None);
    }
}
