//! Index definitions.
//!
//! An [`IndexDefinition`] names the datasources an index spans and the fields
//! it stores, each with a [`FieldType`]. The type decides how item values are
//! coerced at index time and how conditions compare them at query time.

pub mod field;
pub mod index;

pub use field::{FieldDefinition, FieldType};
pub use index::{
    FieldKind, IndexDefinition, VIRTUAL_FIELDS, FIELD_DATASOURCE, FIELD_ID, FIELD_LANGUAGE,
    FIELD_RELEVANCE,
};
