//! Tokenizer implementations for text analysis.
//!
//! Tokenizers are the first step of the analysis pipeline, responsible for
//! splitting input text into tokens.
//!
//! # Examples
//!
//! ```
//! use phalanx::analysis::tokenizer::Tokenizer;
//! use phalanx::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
//!
//! let tokenizer = UnicodeWordTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello world").unwrap().collect();
//! assert_eq!(tokens.len(), 2);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so tokenizers can be shared by concurrent
/// searches.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod unicode_word;

pub use unicode_word::UnicodeWordTokenizer;
