//! Serde helpers for backend timestamps.
//!
//! The backend renders datetimes as `YYYY-MM-DD HH:MM:SS` without a zone, or
//! `null` when the column is empty.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer};

/// Wire format used by the backend.
pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a backend timestamp, also accepting the ISO `T` separator.
///
/// # Errors
///
/// Returns the chrono parse error if neither layout matches.
pub fn parse(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
}

/// `#[serde(with = "...")]` module for `Option<NaiveDateTime>` fields.
pub mod optional {
    use super::{Deserialize, Deserializer, FORMAT, NaiveDateTime, Serializer, parse};

    /// Serialize as the backend layout, or `null`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)]
    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize from the backend layout; `null` and missing become `None`.
    ///
    /// # Errors
    ///
    /// Fails when a non-null value does not match either accepted layout.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| parse(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    struct Stamped {
        #[serde(default, with = "optional")]
        created_at: Option<NaiveDateTime>,
    }

    #[test]
    fn test_parse_backend_layout() {
        let dt = parse("2024-03-01 09:30:15").unwrap();
        assert_eq!(dt.format(FORMAT).to_string(), "2024-03-01 09:30:15");
    }

    #[test]
    fn test_parse_iso_layout() {
        assert!(parse("2024-03-01T09:30:15").is_ok());
        assert!(parse("yesterday").is_err());
    }

    #[test]
    fn test_optional_null_and_missing() {
        let s: Stamped = serde_json::from_str(r#"{"created_at": null}"#).unwrap();
        assert!(s.created_at.is_none());

        let s: Stamped = serde_json::from_str("{}").unwrap();
        assert!(s.created_at.is_none());
    }

    #[test]
    fn test_optional_roundtrip_keeps_layout() {
        let s: Stamped = serde_json::from_str(r#"{"created_at": "2023-12-31 23:59:59"}"#).unwrap();
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"created_at":"2023-12-31 23:59:59"}"#);
    }
}
