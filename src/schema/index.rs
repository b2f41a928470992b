//! Index definition and field resolution.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PhalanxError, Result};
use crate::schema::field::{FieldDefinition, FieldType};

/// Virtual field holding the composite item id.
pub const FIELD_ID: &str = "search_api_id";
/// Virtual field holding the item's datasource id.
pub const FIELD_DATASOURCE: &str = "search_api_datasource";
/// Virtual field holding the item's language.
pub const FIELD_LANGUAGE: &str = "search_api_language";
/// Virtual field holding the backend-assigned relevance. Sort only.
pub const FIELD_RELEVANCE: &str = "search_api_relevance";

/// All virtual fields, available on every index.
pub const VIRTUAL_FIELDS: [&str; 4] = [FIELD_ID, FIELD_DATASOURCE, FIELD_LANGUAGE, FIELD_RELEVANCE];

/// How a field name resolves against an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A real indexed field of the given type.
    Indexed(FieldType),
    /// One of the string-valued virtual fields (id, datasource, language).
    Virtual,
    /// The relevance pseudo field.
    Relevance,
}

impl FieldKind {
    /// The type values of this field compare as.
    pub fn value_type(&self) -> FieldType {
        match self {
            FieldKind::Indexed(field_type) => *field_type,
            FieldKind::Virtual => FieldType::String,
            FieldKind::Relevance => FieldType::Decimal,
        }
    }
}

fn default_tracker() -> String {
    "default".to_string()
}

/// The definition of a search index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Machine name of the index
    pub id: String,
    /// Datasources whose items this index accepts
    pub datasources: Vec<String>,
    /// Indexed fields by name
    #[serde(default)]
    pub fields: BTreeMap<String, FieldDefinition>,
    /// Id of the tracker implementation
    #[serde(default = "default_tracker")]
    pub tracker: String,
}

impl IndexDefinition {
    /// Create a new index definition without fields.
    pub fn new<S: Into<String>>(id: S) -> Self {
        IndexDefinition {
            id: id.into(),
            datasources: Vec::new(),
            fields: BTreeMap::new(),
            tracker: default_tracker(),
        }
    }

    /// Load an index definition from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let definition: IndexDefinition = serde_json::from_str(&content)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Add a datasource.
    pub fn with_datasource<S: Into<String>>(mut self, datasource_id: S) -> Self {
        self.datasources.push(datasource_id.into());
        self
    }

    /// Add a field.
    pub fn with_field<S: Into<String>>(mut self, name: S, field_type: FieldType) -> Self {
        self.fields.insert(name.into(), FieldDefinition::new(field_type));
        self
    }

    /// Change the type of an existing field.
    pub fn set_field_type(&mut self, name: &str, field_type: FieldType) -> Result<()> {
        let field = self.fields.get_mut(name).ok_or_else(|| {
            PhalanxError::invalid_config(format!("Unknown field '{name}' on index '{}'", self.id))
        })?;
        field.field_type = field_type;
        Ok(())
    }

    /// Check the definition for structural problems.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(PhalanxError::invalid_config("Index id must not be empty"));
        }
        if let Some(name) = self
            .fields
            .keys()
            .find(|name| VIRTUAL_FIELDS.contains(&name.as_str()))
        {
            return Err(PhalanxError::invalid_config(format!(
                "Field name '{name}' is reserved"
            )));
        }
        Ok(())
    }

    /// Whether the index accepts items of the datasource.
    pub fn has_datasource(&self, datasource_id: &str) -> bool {
        self.datasources.iter().any(|ds| ds == datasource_id)
    }

    /// Type of a real indexed field.
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).map(|field| field.field_type)
    }

    /// Resolve a field name, including virtual fields.
    pub fn resolve(&self, name: &str) -> Option<FieldKind> {
        match name {
            FIELD_ID | FIELD_DATASOURCE | FIELD_LANGUAGE => Some(FieldKind::Virtual),
            FIELD_RELEVANCE => Some(FieldKind::Relevance),
            _ => self.field_type(name).map(FieldKind::Indexed),
        }
    }

    /// Names of all fulltext fields, in name order.
    pub fn fulltext_fields(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|(_, field)| field.field_type.is_fulltext())
            .map(|(name, _)| name.clone())
            .collect()
    }
}
