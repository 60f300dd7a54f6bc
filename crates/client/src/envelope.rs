//! Backend response envelope and payload shape validation.
//!
//! Every backend response is wrapped as `{code, message, data}`. The adapter
//! strips the wrapper and hands a [`Payload`] to the resource layer, which
//! pulls typed values out of it. A payload that does not have the expected
//! shape yields a [`ShapeMismatch`]; list accessors can absorb that into an
//! empty list instead.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Response wrapper used by every backend route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl Envelope {
    /// Parse an envelope from a raw body. Empty bodies parse as an envelope
    /// with no data.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the body is not a JSON object.
    pub fn parse(body: &str) -> Result<Self, ShapeMismatch> {
        if body.trim().is_empty() {
            return Ok(Self {
                code: None,
                message: None,
                data: None,
            });
        }
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ShapeMismatch::new("JSON envelope", format!("unparsable body ({e})")))?;
        if !value.is_object() {
            return Err(ShapeMismatch::new("JSON envelope", describe(&value)));
        }
        serde_json::from_value(value)
            .map_err(|e| ShapeMismatch::new("JSON envelope", e.to_string()))
    }

    /// Extract only the `message` field from an arbitrary body, if any.
    #[must_use]
    pub fn message_of(body: &str) -> Option<String> {
        Self::parse(body).ok().and_then(|env| env.message)
    }
}

/// A payload whose shape differs from what the caller needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found}")]
pub struct ShapeMismatch {
    /// What the caller was looking for.
    pub expected: String,
    /// What the payload actually contained.
    pub found: String,
}

impl ShapeMismatch {
    #[must_use]
    pub fn new(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// The unwrapped `data` of a successful response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(Option<Value>);

impl Payload {
    #[must_use]
    pub const fn new(data: Option<Value>) -> Self {
        Self(data)
    }

    /// Whether the response carried no data (absent or `null`).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.0, None | Some(Value::Null))
    }

    /// Deserialize the whole payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the payload is empty or does not match `T`.
    pub fn entity<T: DeserializeOwned>(self) -> Result<T, ShapeMismatch> {
        let expected = std::any::type_name::<T>();
        match self.0 {
            None | Some(Value::Null) => Err(ShapeMismatch::new(short_name(expected), "no data")),
            Some(value) => {
                serde_json::from_value(value).map_err(|e| ShapeMismatch::new(short_name(expected), e.to_string()))
            }
        }
    }

    /// Like [`entity`](Self::entity), but an empty payload is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if data is present but does not match `T`.
    pub fn optional<T: DeserializeOwned>(self) -> Result<Option<T>, ShapeMismatch> {
        if self.is_empty() {
            return Ok(None);
        }
        self.entity().map(Some)
    }

    /// Deserialize the array held in `data.<field>`.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the field is missing, not an array, or an
    /// element does not match `T`.
    pub fn list<T: DeserializeOwned>(&self, field: &str) -> Result<Vec<T>, ShapeMismatch> {
        let expected = || format!("array at data.{field}");
        let Some(data) = self.0.as_ref() else {
            return Err(ShapeMismatch::new(expected(), "no data"));
        };
        match data.get(field) {
            Some(Value::Array(items)) => items
                .iter()
                .cloned()
                .map(serde_json::from_value)
                .collect::<Result<Vec<T>, _>>()
                .map_err(|e| ShapeMismatch::new(expected(), e.to_string())),
            Some(other) => Err(ShapeMismatch::new(expected(), describe(other))),
            None => Err(ShapeMismatch::new(expected(), "missing field")),
        }
    }

    /// [`list`](Self::list) with a fallback: any shape mismatch
    /// is logged and yields an empty list.
    #[must_use]
    pub fn list_or_empty<T: DeserializeOwned>(&self, field: &str) -> Vec<T> {
        self.list(field).unwrap_or_else(|mismatch| {
            tracing::warn!(field, %mismatch, "Response shape mismatch, using empty list");
            Vec::new()
        })
    }

    /// Deserialize a scalar or object held in `data.<field>`.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the field is missing or does not match `T`.
    pub fn field<T: DeserializeOwned>(&self, field: &str) -> Result<T, ShapeMismatch> {
        let expected = || format!("{} at data.{field}", short_name(std::any::type_name::<T>()));
        let value = self
            .0
            .as_ref()
            .and_then(|data| data.get(field))
            .ok_or_else(|| ShapeMismatch::new(expected(), "missing field"))?;
        serde_json::from_value(value.clone()).map_err(|e| ShapeMismatch::new(expected(), e.to_string()))
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
    .to_string()
}

fn short_name(type_name: &str) -> &str {
    type_name.rsplit("::").next().unwrap_or(type_name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bookstand_core::Book;
    use serde_json::json;

    use super::*;

    fn payload(value: Value) -> Payload {
        Payload::new(Some(value))
    }

    #[test]
    fn test_parse_envelope() {
        let env = Envelope::parse(r#"{"code":200,"message":"成功","data":{"books":[]}}"#).unwrap();
        assert_eq!(env.code, Some(200));
        assert_eq!(env.message.as_deref(), Some("成功"));
        assert_eq!(env.data, Some(json!({"books": []})));
    }

    #[test]
    fn test_parse_empty_body() {
        let env = Envelope::parse("  ").unwrap();
        assert!(env.data.is_none());
    }

    #[test]
    fn test_parse_rejects_non_object() {
        let err = Envelope::parse("[1,2]").unwrap_err();
        assert_eq!(err.found, "array");
        assert!(Envelope::parse("<html>").is_err());
    }

    #[test]
    fn test_message_of() {
        assert_eq!(
            Envelope::message_of(r#"{"code":404,"message":"图书不存在"}"#).as_deref(),
            Some("图书不存在")
        );
        assert_eq!(Envelope::message_of("Internal Server Error"), None);
    }

    #[test]
    fn test_list_present() {
        let p = payload(json!({"books": [
            {"id": 1, "title": "A", "author": "x", "price": 10.0, "stock": 1},
            {"id": 2, "title": "B", "author": "y", "price": 12.5, "stock": 0},
        ]}));
        let books: Vec<Book> = p.list("books").unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[1].title, "B");
    }

    #[test]
    fn test_list_missing_field_falls_back() {
        let p = payload(json!({}));
        assert!(p.list::<Book>("books").is_err());
        assert!(p.list_or_empty::<Book>("books").is_empty());
    }

    #[test]
    fn test_list_not_an_array_falls_back() {
        let p = payload(json!({"books": {"id": 1}}));
        let err = p.list::<Book>("books").unwrap_err();
        assert_eq!(err.expected, "array at data.books");
        assert_eq!(err.found, "object");
        assert!(p.list_or_empty::<Book>("books").is_empty());
    }

    #[test]
    fn test_list_without_data_falls_back() {
        assert!(Payload::default().list_or_empty::<Book>("books").is_empty());
    }

    #[test]
    fn test_entity_requires_data() {
        let err = Payload::new(Some(Value::Null)).entity::<Book>().unwrap_err();
        assert_eq!(err.expected, "Book");
        assert_eq!(err.found, "no data");
    }

    #[test]
    fn test_optional_entity() {
        assert!(Payload::default().optional::<Book>().unwrap().is_none());
        let book = payload(json!({"id": 3, "title": "C", "author": "z", "price": 1.0, "stock": 4}))
            .optional::<Book>()
            .unwrap()
            .unwrap();
        assert_eq!(book.stock, 4);
    }

    #[test]
    fn test_field() {
        let p = payload(json!({"total": 7}));
        assert_eq!(p.field::<u64>("total").unwrap(), 7);
        assert!(p.field::<u64>("missing").is_err());
    }
}
