//! Length filter implementation.
//!
//! Marks tokens whose length in Unicode code points falls outside
//! `[min, max]` as stopped.

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that stops tokens that are too short or too long.
#[derive(Clone, Debug)]
pub struct LengthFilter {
    min: usize,
    max: usize,
}

impl LengthFilter {
    /// Create a new length filter. Both bounds are inclusive.
    pub fn new(min: usize, max: usize) -> Self {
        LengthFilter { min, max }
    }

    /// Minimum accepted length.
    pub fn min(&self) -> usize {
        self.min
    }

    /// Maximum accepted length.
    pub fn max(&self) -> usize {
        self.max
    }
}

impl Filter for LengthFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let (min, max) = (self.min, self.max);
        Ok(Box::new(tokens.map(move |token| {
            let len = token.char_len();
            if !token.is_stopped() && (len < min || len > max) {
                token.stop()
            } else {
                token
            }
        })))
    }

    fn name(&self) -> &'static str {
        "length"
    }
}
