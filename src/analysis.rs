//! Text analysis for fulltext fields and search keys.
//!
//! Fulltext field values and search terms go through the same kind of
//! pipeline: a tokenizer splits the text, then token filters normalize, truncate
//! or stop individual tokens. Stopped tokens stay in the stream so that callers
//! can report them (for example as ignored search keys).

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
