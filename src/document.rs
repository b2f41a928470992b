//! Items and their field values.
//!
//! An [`item::Item`] is the unit handed to a backend for indexing. Items are
//! produced by the content storage that owns the data; this crate only reads
//! them.

pub mod field_value;
pub mod item;

pub use field_value::FieldValue;
pub use item::{Item, ItemBuilder};
