//! Search query model.
//!
//! A [`Query`] combines optional fulltext [`Keys`] with a root
//! [`ConditionGroup`] of field conditions, sorts, a range, a language filter and
//! a free-form option bag. Executing it through its index's server yields a
//! [`ResultSet`].
//!
//! Keys and condition groups are deliberately separate types: both are boolean
//! trees, but keys have search terms at their leaves while condition groups
//! have field conditions.

pub mod condition;
pub mod condition_group;
pub mod keys;
pub mod matcher;
#[allow(clippy::module_inception)]
pub mod query;
pub mod result_set;
pub mod sort;

pub use condition::{Condition, ConditionValue, Operator};
pub use condition_group::{Clause, ConditionGroup, Conjunction};
pub use keys::{Keys, KeysGroup};
pub use query::{Query, Range, SearchRequest};
pub use result_set::{ResultItem, ResultSet};
pub use sort::{Sort, SortDirection};
