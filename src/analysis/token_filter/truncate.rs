//! Truncate filter implementation.
//!
//! Shortens tokens to a maximum number of Unicode code points. Used at index
//! time, where overlong words must still be stored.

use log::warn;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that truncates tokens to at most `max_chars` code points.
#[derive(Clone, Debug)]
pub struct TruncateFilter {
    max_chars: usize,
}

impl TruncateFilter {
    /// Create a new truncate filter.
    pub fn new(max_chars: usize) -> Self {
        TruncateFilter { max_chars }
    }

    /// Get the maximum token length.
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }
}

/// Truncate `text` to `max_chars` code points, never splitting a character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

impl Filter for TruncateFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let max_chars = self.max_chars;
        Ok(Box::new(tokens.map(move |token| {
            let truncated = truncate_chars(&token.text, max_chars);
            if truncated.len() == token.text.len() {
                token
            } else {
                warn!(
                    "An overlong word (more than {max_chars} characters) was encountered while indexing: {}",
                    token.text
                );
                token.with_text(truncated)
            }
        })))
    }

    fn name(&self) -> &'static str {
        "truncate"
    }
}
