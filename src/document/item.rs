//! Items handed to backends for indexing.
//!
//! Item ids are composite: `"<datasource id>/<raw id>"`, so that one index can
//! hold items of several datasources without collisions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::document::field_value::FieldValue;

/// Language code used for items without a language.
pub const LANGUAGE_NOT_SPECIFIED: &str = "und";

/// A single unit of indexable content.
///
/// Fields are multi-valued: every field maps to an ordered list of values, and
/// an empty list is equivalent to the field being absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// The composite item id
    pub id: String,
    /// The datasource the item belongs to
    pub datasource_id: String,
    /// The item's language code
    #[serde(default = "default_language")]
    pub language: String,
    /// The field values for this item
    #[serde(default)]
    pub fields: HashMap<String, Vec<FieldValue>>,
}

fn default_language() -> String {
    LANGUAGE_NOT_SPECIFIED.to_string()
}

impl Item {
    /// Create a new item without field values.
    pub fn new<S: Into<String>, D: Into<String>>(id: S, datasource_id: D) -> Self {
        Item {
            id: id.into(),
            datasource_id: datasource_id.into(),
            language: default_language(),
            fields: HashMap::new(),
        }
    }

    /// Create a builder for the item with the given datasource and raw id.
    pub fn builder(datasource_id: &str, raw_id: &str) -> ItemBuilder {
        ItemBuilder::new(datasource_id, raw_id)
    }

    /// Combine a datasource id and a raw id into a composite item id.
    pub fn combine_id(datasource_id: &str, raw_id: &str) -> String {
        format!("{datasource_id}/{raw_id}")
    }

    /// Split a composite item id into datasource id and raw id.
    ///
    /// Datasource ids never contain a slash, so the first slash separates them.
    pub fn split_id(item_id: &str) -> Option<(&str, &str)> {
        item_id.split_once('/')
    }

    /// The raw id within the datasource.
    pub fn raw_id(&self) -> &str {
        Self::split_id(&self.id).map_or(self.id.as_str(), |(_, raw)| raw)
    }

    /// Append a value to a field.
    pub fn add_value<S: Into<String>>(&mut self, name: S, value: FieldValue) {
        self.fields.entry(name.into()).or_default().push(value);
    }

    /// Get all values of a field; empty if the field is absent.
    pub fn values(&self, name: &str) -> &[FieldValue] {
        self.fields.get(name).map_or(&[], Vec::as_slice)
    }

    /// Whether the item has no field values at all.
    pub fn is_empty(&self) -> bool {
        self.fields.values().all(Vec::is_empty)
    }
}

/// A builder for constructing items in a fluent manner.
#[derive(Debug)]
pub struct ItemBuilder {
    item: Item,
}

impl ItemBuilder {
    /// Create a new item builder.
    pub fn new(datasource_id: &str, raw_id: &str) -> Self {
        ItemBuilder {
            item: Item::new(Item::combine_id(datasource_id, raw_id), datasource_id),
        }
    }

    /// Set the item language.
    pub fn language<S: Into<String>>(mut self, language: S) -> Self {
        self.item.language = language.into();
        self
    }

    /// Add a text value.
    pub fn add_text<S: Into<String>, T: Into<String>>(mut self, name: S, value: T) -> Self {
        self.item.add_value(name, FieldValue::Text(value.into()));
        self
    }

    /// Add an integer value.
    pub fn add_integer<S: Into<String>>(mut self, name: S, value: i64) -> Self {
        self.item.add_value(name, FieldValue::Integer(value));
        self
    }

    /// Add a float value.
    pub fn add_float<S: Into<String>>(mut self, name: S, value: f64) -> Self {
        self.item.add_value(name, FieldValue::Float(value));
        self
    }

    /// Add a boolean value.
    pub fn add_boolean<S: Into<String>>(mut self, name: S, value: bool) -> Self {
        self.item.add_value(name, FieldValue::Boolean(value));
        self
    }

    /// Add several values to a multi-valued field.
    pub fn add_values<S, I, V>(mut self, name: S, values: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        let name = name.into();
        for value in values {
            self.item.add_value(name.clone(), value.into());
        }
        self
    }

    /// Add a field with a generic value.
    pub fn add_field<S: Into<String>>(mut self, name: S, value: FieldValue) -> Self {
        self.item.add_value(name, value);
        self
    }

    /// Build the final item.
    pub fn build(self) -> Item {
        self.item
    }
}
