//! Schema of the JSON document casparser writes with `-o`.
//!
//! Nothing here is allowed to fail: scalar fields stay as [`Value`] and are read
//! through [`crate::domain::coerce`], collections that have the wrong shape are
//! treated as empty.

use crate::domain::coerce;
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawParseResult {
    /// `None` when the document has no `folios` array.
    #[serde(default, deserialize_with = "optional_seq")]
    pub folios: Option<Vec<RawFolio>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawFolio {
    #[serde(default)]
    pub folio: Value,
    #[serde(default, deserialize_with = "seq_or_empty")]
    pub schemes: Vec<Option<RawScheme>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawScheme {
    #[serde(default)]
    pub scheme: Value,
    #[serde(default)]
    pub isin: Value,
    #[serde(default)]
    pub amfi: Value,
    #[serde(default)]
    pub rta: Value,
    #[serde(default)]
    pub r#type: Value,
    #[serde(default)]
    pub close: Value,
    #[serde(default, deserialize_with = "optional_record")]
    pub valuation: Option<RawValuation>,
    #[serde(default, deserialize_with = "seq_or_empty")]
    pub transactions: Vec<RawTransaction>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawValuation {
    #[serde(default)]
    pub nav: Value,
    #[serde(default)]
    pub cost: Value,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawTransaction {
    #[serde(default)]
    pub date: Value,
    #[serde(default)]
    pub description: Value,
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub units: Value,
    #[serde(default)]
    pub nav: Value,
    #[serde(default)]
    pub balance: Value,
    #[serde(default)]
    pub r#type: Value,
}

impl RawParseResult {
    /// 從任意 JSON 值建立，頂層不是物件時視為空結果
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            other => {
                tracing::warn!("Unexpected top-level casparser output: {}", kind_of(&other));
                Self::default()
            }
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Only JSON objects are decoded. serde would otherwise fill struct fields from
/// an array by position.
fn decode_record<T>(value: Value) -> T
where
    T: DeserializeOwned + Default,
{
    match value {
        Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
        _ => T::default(),
    }
}

/// Lenient element decoding: an element of the wrong shape becomes `T::default()`.
fn decode_items<T>(items: Vec<Value>) -> Vec<T>
where
    T: DeserializeOwned + Default,
{
    items.into_iter().map(decode_record).collect()
}

fn optional_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(decode_items(items))),
        _ => Ok(None),
    }
}

fn seq_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(optional_seq(deserializer)?.unwrap_or_default())
}

fn optional_record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if !coerce::is_present(&value) {
        return Ok(None);
    }
    Ok(Some(decode_record(value)))
}
