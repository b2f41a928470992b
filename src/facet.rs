//! Facet requests and aggregation.
//!
//! Facets are requested through the [`FACETS_OPTION`] query option, which maps
//! a facet name to a [`FacetSpec`]. For every facet a backend evaluates the
//! query with a possibly restricted condition group (see [`restrict`]), counts
//! the distinct values of the facet field among the matching items with a
//! [`FacetCollector`] and stores the resulting buckets in the result set's
//! extra data under the same option name.

pub mod aggregator;
pub mod restrict;
pub mod spec;

pub use aggregator::{FacetBucket, FacetCollector};
pub use restrict::{exclusion_tag, restricted_group};
pub use spec::{FacetOperator, FacetSpec};

/// Query option and result extra data key for facets.
pub const FACETS_OPTION: &str = "search_api_facets";

/// Filter of the bucket counting items without a value.
pub const MISSING_FILTER: &str = "!";
