//! # Phalanx
//!
//! A backend-agnostic search query and facet engine for Rust.
//!
//! ## Features
//!
//! - Structured queries: fulltext keys, nested condition groups, sorts, ranges
//!   and language filters
//! - One [`Backend`](backend::Backend) contract with optional feature negotiation
//! - Facets with minimum counts, missing buckets and OR facets that ignore
//!   their own filters
//! - A complete in-memory backend
//! - Unicode aware text analysis
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use phalanx::backend::InMemoryBackend;
//! use phalanx::document::Item;
//! use phalanx::query::Operator;
//! use phalanx::schema::{FieldType, IndexDefinition};
//! use phalanx::server::Server;
//!
//! # fn main() -> phalanx::error::Result<()> {
//! let server = Server::new("memory", Arc::new(InMemoryBackend::default()));
//! let index = server.create_index(
//!     IndexDefinition::new("articles")
//!         .with_datasource("node")
//!         .with_field("title", FieldType::Text)
//!         .with_field("type", FieldType::String),
//! )?;
//!
//! index.index_items(&[
//!     Item::builder("node", "1")
//!         .add_text("title", "Hello world")
//!         .add_text("type", "page")
//!         .build(),
//!     Item::builder("node", "2")
//!         .add_text("title", "Hello there")
//!         .add_text("type", "post")
//!         .build(),
//! ])?;
//!
//! let mut query = index.query();
//! query.keys("hello").add_condition("type", "post", Operator::Eq);
//! let results = query.execute()?;
//! assert_eq!(results.ids(), vec!["node/2"]);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod backend;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod facet;
pub mod query;
pub mod schema;
pub mod server;
pub mod tracker;

pub mod prelude {
    pub use crate::backend::{Backend, InMemoryBackend};
    pub use crate::config::BackendConfig;
    pub use crate::document::{FieldValue, Item};
    pub use crate::error::{PhalanxError, Result};
    pub use crate::facet::{FacetBucket, FacetOperator, FacetSpec};
    pub use crate::query::{
        ConditionGroup, Conjunction, Keys, Operator, Query, ResultSet, SortDirection,
    };
    pub use crate::schema::{FieldType, IndexDefinition};
    pub use crate::server::{Index, Server};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
