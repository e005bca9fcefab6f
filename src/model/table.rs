//! Table metadata returned by the backend

use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Deserializer, Serialize};

/// One row of underlying table data. Opaque to the client.
pub type SampleRow = serde_json::Value;

/// Metadata for a single table: its name and ordered attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableInfo {
    pub table_name: String,
    #[serde(default)]
    pub attributes: Vec<AttributeInfo>,
}

/// A single attribute of a table, with the user's memo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeInfo {
    pub attribute_name: String,
    pub type_hint: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Last time the backend saw this attribute
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_seen_at: Option<DateTime<FixedOffset>>,
}

/// An unparseable timestamp is dropped rather than failing the whole table
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

impl AttributeInfo {
    pub fn new(attribute_name: impl Into<String>, type_hint: impl Into<String>) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            type_hint: type_hint.into(),
            description: None,
            last_seen_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// `last_seen_at` rendered in local time
    pub fn formatted_last_seen(&self) -> Option<String> {
        self.last_seen_at
            .map(|ts| ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
    }
}

/// Styling category for an attribute's `type_hint`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeBadge {
    String,
    Number,
    Binary,
    Other,
}

impl TypeBadge {
    pub fn from_hint(type_hint: &str) -> Self {
        match type_hint {
            "string" => TypeBadge::String,
            "number" => TypeBadge::Number,
            "binary" => TypeBadge::Binary,
            _ => TypeBadge::Other,
        }
    }
}
