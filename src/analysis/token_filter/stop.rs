//! Stop filter implementation.
//!
//! Marks configured stop words as stopped. Matching is case-insensitive.
//!
//! # Examples
//!
//! ```
//! use phalanx::analysis::token_filter::Filter;
//! use phalanx::analysis::token_filter::stop::StopFilter;
//! use phalanx::analysis::token::Token;
//!
//! let filter = StopFilter::from_words(vec!["the", "and"]);
//! let tokens = vec![Token::new("The", 0), Token::new("quick", 1)];
//!
//! let result: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert!(result[0].is_stopped());
//! assert!(!result[1].is_stopped());
//! ```

use std::sync::Arc;

use ahash::AHashSet;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that marks stop words as stopped.
#[derive(Clone, Debug, Default)]
pub struct StopFilter {
    /// Lowercased stop words
    stop_words: Arc<AHashSet<String>>,
}

impl StopFilter {
    /// Create a stop filter from a list of words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stop_words = words
            .into_iter()
            .map(|word| word.as_ref().to_lowercase())
            .collect();
        StopFilter {
            stop_words: Arc::new(stop_words),
        }
    }

    /// Check if a word is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(&word.to_lowercase())
    }

    /// Number of configured stop words.
    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    /// Whether no stop words are configured.
    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        if self.stop_words.is_empty() {
            return Ok(tokens);
        }
        let stop_words = Arc::clone(&self.stop_words);
        Ok(Box::new(tokens.map(move |token| {
            if !token.is_stopped() && stop_words.contains(&token.text.to_lowercase()) {
                token.stop()
            } else {
                token
            }
        })))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}
