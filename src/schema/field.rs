//! Field definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The data type of an indexed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Tokenized fulltext
    Text,
    /// Verbatim string, limited in length
    String,
    /// 64-bit integer
    Integer,
    /// Floating point number
    Decimal,
    /// Boolean
    Boolean,
    /// Point in time, compared by timestamp
    Date,
}

impl FieldType {
    /// Whether values of this type take part in fulltext key matching.
    pub fn is_fulltext(&self) -> bool {
        matches!(self, FieldType::Text)
    }

    /// Whether values of this type compare numerically.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Decimal)
    }

    /// Get the name of this field type.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Decimal => "decimal",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Definition of a single indexed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// The field type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Human readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FieldDefinition {
    /// Create a new field definition.
    pub fn new(field_type: FieldType) -> Self {
        FieldDefinition {
            field_type,
            label: None,
        }
    }

    /// Set the label.
    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = Some(label.into());
        self
    }
}
