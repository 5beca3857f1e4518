//! Unit-suffixed duration values as rendered by the instrumentation agent
//!
//! The agent writes timings like `"12.5ms"`. The numeric magnitude is obtained
//! by dropping the fixed two-character unit suffix; the original text is kept
//! verbatim for display.

use crate::error::{Result, TreeError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Length of the unit suffix in characters (e.g. `ms`)
pub const UNIT_SUFFIX_LEN: usize = 2;

/// A formatted timing value plus its parsed magnitude
#[derive(Debug, Clone, PartialEq)]
pub struct DurationValue {
    display: String,
    magnitude: f64,
}

impl DurationValue {
    /// Parse a unit-suffixed timing such as `"250ms"` or `"0.75ms"`
    pub fn parse(text: &str) -> Result<Self> {
        let char_count = text.chars().count();
        if char_count <= UNIT_SUFFIX_LEN {
            return Err(TreeError::InvalidDuration(text.to_string()));
        }

        let number: String = text.chars().take(char_count - UNIT_SUFFIX_LEN).collect();
        let magnitude = number
            .trim()
            .parse::<f64>()
            .map_err(|_| TreeError::InvalidDuration(text.to_string()))?;
        if !magnitude.is_finite() {
            return Err(TreeError::InvalidDuration(text.to_string()));
        }

        Ok(Self {
            display: text.to_string(),
            magnitude,
        })
    }

    /// Build a value in milliseconds, formatted the way the agent does
    pub fn from_millis(millis: f64) -> Self {
        Self {
            display: format!("{}ms", millis),
            magnitude: millis,
        }
    }

    /// Numeric magnitude with the unit suffix stripped
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Original formatted text
    pub fn as_str(&self) -> &str {
        &self.display
    }
}

impl fmt::Display for DurationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl Serialize for DurationValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display)
    }
}

impl<'de> Deserialize<'de> for DurationValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        DurationValue::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer_millis() {
        let d = DurationValue::parse("250ms").unwrap();
        assert_eq!(d.magnitude(), 250.0);
        assert_eq!(d.as_str(), "250ms");
    }

    #[test]
    fn test_parse_fractional_millis() {
        let d = DurationValue::parse("0.125ms").unwrap();
        assert_eq!(d.magnitude(), 0.125);
    }

    #[test]
    fn test_parse_multibyte_suffix() {
        // Suffix is two characters, not two bytes
        let d = DurationValue::parse("42µs").unwrap();
        assert_eq!(d.magnitude(), 42.0);
        assert_eq!(d.to_string(), "42µs");
    }

    #[test]
    fn test_parse_rejects_suffix_only() {
        assert!(DurationValue::parse("ms").is_err());
        assert!(DurationValue::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = DurationValue::parse("fastms").unwrap_err();
        assert_eq!(err, TreeError::InvalidDuration("fastms".into()));
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        assert!(DurationValue::parse("NaNms").is_err());
        assert!(DurationValue::parse("infms").is_err());
    }

    #[test]
    fn test_comparison_uses_magnitude_not_text() {
        // "9ms" > "10ms" lexically, but not numerically
        let nine = DurationValue::parse("9ms").unwrap();
        let ten = DurationValue::parse("10ms").unwrap();
        assert!(nine.as_str() > ten.as_str());
        assert!(nine.magnitude() < ten.magnitude());
    }

    #[test]
    fn test_from_millis_formats_like_agent() {
        let d = DurationValue::from_millis(12.5);
        assert_eq!(d.as_str(), "12.5ms");
        assert_eq!(DurationValue::parse(d.as_str()).unwrap(), d);
    }

    #[test]
    fn test_serde_keeps_display_text() {
        let d: DurationValue = serde_json::from_str("\"1200ms\"").unwrap();
        assert_eq!(d.magnitude(), 1200.0);
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"1200ms\"");
    }
}
