//! # Theme Documents
//!
//! A [ThemeDocument] is the nested key-value structure describing every
//! themable attribute of one visual theme. Documents are produced by the
//! [loader](crate::loader) from JSON, property lists or TOML and are never
//! mutated once they are handed to the [registry](crate::registry).
//!
//! ```rust
//! use tapkit_theme::document::{DocValue, ThemeDocument};
//!
//! let doc = ThemeDocument::new()
//!     .with("card", ThemeDocument::new().with("textColor", "#1a1a1a"));
//!
//! assert_eq!(doc.resolve("card.textColor").and_then(DocValue::as_str), Some("#1a1a1a"));
//! ```

use indexmap::IndexMap;

use crate::key_path;

/// A raw value stored inside a [ThemeDocument].
#[derive(Debug, Clone, PartialEq)]
pub enum DocValue {
    /// A string leaf.
    String(String),
    /// A numeric leaf. Integers are widened to `f64`.
    Number(f64),
    /// A boolean leaf.
    Bool(bool),
    /// A nested document.
    Map(ThemeDocument),
    /// A sequence of values.
    List(Vec<DocValue>),
}

impl DocValue {
    /// Get the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// Get the number value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DocValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Get the boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DocValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Get the nested document, if this is a map.
    pub fn as_map(&self) -> Option<&ThemeDocument> {
        match self {
            DocValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Get the sequence, if this is a list.
    pub fn as_list(&self) -> Option<&[DocValue]> {
        match self {
            DocValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the variant, used in log lines.
    pub fn type_name(&self) -> &'static str {
        match self {
            DocValue::String(_) => "string",
            DocValue::Number(_) => "number",
            DocValue::Bool(_) => "bool",
            DocValue::Map(_) => "map",
            DocValue::List(_) => "list",
        }
    }

    /// Convert a JSON value. `null` has no counterpart and yields `None`.
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        match value {
            Value::Null => None,
            Value::Bool(value) => Some(DocValue::Bool(value)),
            Value::Number(number) => number.as_f64().map(DocValue::Number),
            Value::String(value) => Some(DocValue::String(value)),
            Value::Array(items) => Some(DocValue::List(
                items.into_iter().filter_map(DocValue::from_json).collect(),
            )),
            Value::Object(map) => Some(DocValue::Map(
                map.into_iter()
                    .filter_map(|(key, value)| DocValue::from_json(value).map(|value| (key, value)))
                    .collect(),
            )),
        }
    }

    /// Convert a TOML value. Datetimes are kept in their textual form.
    pub fn from_toml(value: toml::Value) -> Self {
        use toml::Value;

        match value {
            Value::String(value) => DocValue::String(value),
            Value::Integer(value) => DocValue::Number(value as f64),
            Value::Float(value) => DocValue::Number(value),
            Value::Boolean(value) => DocValue::Bool(value),
            Value::Datetime(value) => DocValue::String(value.to_string()),
            Value::Array(items) => DocValue::List(items.into_iter().map(DocValue::from_toml).collect()),
            Value::Table(table) => DocValue::Map(
                table
                    .into_iter()
                    .map(|(key, value)| (key, DocValue::from_toml(value)))
                    .collect(),
            ),
        }
    }

    /// Convert a property list value. Data, date and UID leaves are dropped.
    pub fn from_plist(value: plist::Value) -> Option<Self> {
        use plist::Value;

        match value {
            Value::String(value) => Some(DocValue::String(value)),
            Value::Boolean(value) => Some(DocValue::Bool(value)),
            Value::Real(value) => Some(DocValue::Number(value)),
            Value::Integer(value) => value
                .as_signed()
                .map(|value| value as f64)
                .or_else(|| value.as_unsigned().map(|value| value as f64))
                .map(DocValue::Number),
            Value::Array(items) => Some(DocValue::List(
                items.into_iter().filter_map(DocValue::from_plist).collect(),
            )),
            Value::Dictionary(dict) => Some(DocValue::Map(
                dict.into_iter()
                    .filter_map(|(key, value)| DocValue::from_plist(value).map(|value| (key, value)))
                    .collect(),
            )),
            _ => None,
        }
    }
}

impl From<&str> for DocValue {
    fn from(value: &str) -> Self {
        DocValue::String(value.to_string())
    }
}

impl From<String> for DocValue {
    fn from(value: String) -> Self {
        DocValue::String(value)
    }
}

impl From<f64> for DocValue {
    fn from(value: f64) -> Self {
        DocValue::Number(value)
    }
}

impl From<i32> for DocValue {
    fn from(value: i32) -> Self {
        DocValue::Number(value.into())
    }
}

impl From<bool> for DocValue {
    fn from(value: bool) -> Self {
        DocValue::Bool(value)
    }
}

impl From<ThemeDocument> for DocValue {
    fn from(value: ThemeDocument) -> Self {
        DocValue::Map(value)
    }
}

impl<T: Into<DocValue>> From<Vec<T>> for DocValue {
    fn from(items: Vec<T>) -> Self {
        DocValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// An immutable nested mapping from string keys to [DocValue]s.
///
/// Key order of the source document is preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeDocument {
    entries: IndexMap<String, DocValue>,
}

impl ThemeDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion, used to assemble documents in code.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DocValue>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Get a direct child.
    pub fn get(&self, key: &str) -> Option<&DocValue> {
        self.entries.get(key)
    }

    /// Resolve a dotted key path, see [key_path::resolve].
    pub fn resolve(&self, key_path: &str) -> Option<&DocValue> {
        key_path::resolve(self, key_path)
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document has no children.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the direct children in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DocValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Keys of the direct children in source order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl FromIterator<(String, DocValue)> for ThemeDocument {
    fn from_iter<I: IntoIterator<Item = (String, DocValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_drops_null_members() {
        let value = DocValue::from_json(json!({
            "color": "#fff",
            "size": 12,
            "missing": null,
            "items": [1, null, "two"],
        }))
        .unwrap();

        let doc = value.as_map().unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.get("size"), Some(&DocValue::Number(12.0)));
        assert!(doc.get("missing").is_none());
        assert_eq!(doc.get("items").and_then(DocValue::as_list).map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_from_toml_preserves_tables() {
        let value: toml::Value = toml::from_str(
            r##"
            [card]
            textColor = "#000000"
            radius = 4
            "##,
        )
        .unwrap();

        let doc = DocValue::from_toml(value);
        let card = doc.as_map().and_then(|doc| doc.get("card")).and_then(DocValue::as_map).unwrap();
        assert_eq!(card.get("textColor").and_then(DocValue::as_str), Some("#000000"));
        assert_eq!(card.get("radius").and_then(DocValue::as_f64), Some(4.0));
    }

    #[test]
    fn test_builder_keeps_insertion_order() {
        let doc = ThemeDocument::new().with("b", 1).with("a", true).with("c", "x");
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }
}
