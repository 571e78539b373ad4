//! Record attribute maps as supplied by the record source.
//!
//! A record is a flat map of attribute name to value. Only named fields are
//! read (per-year KPI fields, category flags, region and route names), so no
//! storage representation is assumed beyond that.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl AttributeValue {
    /// Numeric view of the value.
    ///
    /// Numeric text is parsed; anything unparseable, non-finite or null
    /// yields `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            AttributeValue::Number(n) => *n,
            AttributeValue::Text(s) => s.trim().parse::<f64>().ok()?,
            AttributeValue::Null | AttributeValue::Bool(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Text view used for exact-match comparisons.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            AttributeValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
            AttributeValue::Number(n) => Some(Cow::Owned(n.to_string())),
            AttributeValue::Bool(b) => Some(Cow::Owned(b.to_string())),
            AttributeValue::Null => None,
        }
    }

    /// Whether a boolean flag attribute is set (`1`, `true`, `"1"`).
    pub fn is_flag_set(&self) -> bool {
        match self {
            AttributeValue::Bool(b) => *b,
            AttributeValue::Number(n) => *n == 1.0,
            AttributeValue::Text(s) => matches!(s.trim(), "1" | "true" | "TRUE" | "True"),
            AttributeValue::Null => false,
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Number(value as f64)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Number(f64::from(value))
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttributeValue::Null, Into::into)
    }
}

/// One road-segment record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    attributes: HashMap<String, AttributeValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&AttributeValue> {
        self.attributes.get(field)
    }

    /// Numeric value of a field; missing, null or unparseable fields are `None`.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(AttributeValue::as_f64)
    }

    pub fn text(&self, field: &str) -> Option<Cow<'_, str>> {
        self.get(field).and_then(AttributeValue::as_text)
    }

    pub fn flag(&self, field: &str) -> bool {
        self.get(field).is_some_and(AttributeValue::is_flag_set)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            attributes: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_text_is_parsed() {
        let record = Record::new().with("AIRI_2018", " 3.25 ").with("ROUTE", "R123");
        assert_eq!(record.number("AIRI_2018"), Some(3.25));
        assert_eq!(record.number("ROUTE"), None);
        assert_eq!(record.number("missing"), None);
    }

    #[test]
    fn test_nan_and_null_are_not_numbers() {
        let record = Record::new()
            .with("a", f64::NAN)
            .with("b", AttributeValue::Null)
            .with("c", f64::INFINITY);
        assert_eq!(record.number("a"), None);
        assert_eq!(record.number("b"), None);
        assert_eq!(record.number("c"), None);
    }

    #[test]
    fn test_flag_forms() {
        let record = Record::new()
            .with("IsDublin", 1)
            .with("IsPeat", 0)
            .with("IsCityTown", true)
            .with("IsFormerNa", "1");
        assert!(record.flag("IsDublin"));
        assert!(!record.flag("IsPeat"));
        assert!(record.flag("IsCityTown"));
        assert!(record.flag("IsFormerNa"));
        assert!(!record.flag("Unknown"));
    }

    #[test]
    fn test_deserialize_from_attribute_map() {
        let record: Record =
            serde_json::from_str(r#"{"LA_NAME": "Cork", "AIRI_2018": 4.1, "IsDublin": 0, "x": null}"#)
                .unwrap();
        assert_eq!(record.text("LA_NAME").as_deref(), Some("Cork"));
        assert_eq!(record.number("AIRI_2018"), Some(4.1));
        assert_eq!(record.get("x"), Some(&AttributeValue::Null));
        assert!(!record.flag("IsDublin"));
    }
}
