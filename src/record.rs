use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;

/// A single cell. CSV sources only ever yield `Text` (or `Empty` for a
/// short row); JSON sources can carry numbers and nulls.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Number(f64),
    Empty,
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Empty => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

/// One row: column name → value, in source column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

pub type RecordSet = Vec<Record>;

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.insert(column, value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }

    pub fn get_text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_text)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == column)
    }

    /// Replaces in place when the column exists (keeping its position),
    /// appends otherwise.
    pub fn insert(&mut self, column: &str, value: Value) {
        match self.fields.iter_mut().find(|(name, _)| name == column) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((column.to_string(), value)),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Identifier used in warnings: the SKU text, or empty.
    pub fn sku(&self) -> String {
        self.get("SKU").map(|v| v.to_string()).unwrap_or_default()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(&name, value);
        }
        record
    }
}

// Hand-written so JSON objects keep their key order.
impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of column names to string, number or null")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Record, A::Error> {
                let mut record = Record::new();
                while let Some((name, value)) = map.next_entry::<String, crate::record::Value>()? {
                    record.insert(&name, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_first_position_on_duplicate() {
        let mut r = Record::new().with("SKU", "a").with("Name", "x");
        r.insert("SKU", Value::from("b"));
        assert_eq!(r.columns().collect::<Vec<_>>(), vec!["SKU", "Name"]);
        assert_eq!(r.get_text("SKU"), Some("b"));
    }

    #[test]
    fn json_object_keeps_key_order_and_types() {
        let r: Record =
            serde_json::from_str(r#"{"Name": "Yarn", "Regular price": 12.5, "Piece": null}"#)
                .unwrap();
        assert_eq!(
            r.columns().collect::<Vec<_>>(),
            vec!["Name", "Regular price", "Piece"]
        );
        assert_eq!(r.get("Regular price"), Some(&Value::Number(12.5)));
        assert_eq!(r.get("Piece"), Some(&Value::Empty));
    }

    #[test]
    fn number_display_drops_integral_fraction() {
        assert_eq!(Value::Number(12.0).to_string(), "12");
        assert_eq!(Value::Number(12.5).to_string(), "12.5");
        assert_eq!(Value::Empty.to_string(), "");
    }
}
