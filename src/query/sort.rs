//! Sort specifications.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

/// Sort by a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl Sort {
    pub fn new<S: Into<String>>(field: S, direction: SortDirection) -> Self {
        Sort {
            field: field.into(),
            direction,
        }
    }

    pub fn asc<S: Into<String>>(field: S) -> Self {
        Sort::new(field, SortDirection::Asc)
    }

    pub fn desc<S: Into<String>>(field: S) -> Self {
        Sort::new(field, SortDirection::Desc)
    }
}
