//! Token filter implementations for token transformation.
//!
//! Filters that reject a token mark it as stopped instead of removing it, so
//! the query side can report which parts of the search keys were ignored.

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod length;
pub mod lowercase;
pub mod stop;
pub mod truncate;

pub use length::LengthFilter;
pub use lowercase::LowercaseFilter;
pub use stop::StopFilter;
pub use truncate::TruncateFilter;
