//! Sentence-synthesis library for a chatbot that learns Japanese.
//!
//! This crate learns from morphologically analysed sentences and writes new
//! ones by recombining seen words under seen grammatical skeletons:
//! - Vocabulary, structure and adjacency indices (`Dictionary`)
//! - Skeleton-driven and chain-driven generation (`Generator`)
//! - Compound proper-noun detection
//! - A JSON Lines training corpus with a binary dictionary cache
//!
//! Morphological analysis itself is delegated to an external analyser
//! through the [`tokenizer::Tokenize`] trait.

/// Learned indices and generation logic.
pub mod model;

/// Durable training corpus.
pub mod corpus;

/// Error type and crate `Result` alias.
pub mod error;

/// Morphological analyser seam and sentence splitting.
pub mod tokenizer;

/// I/O utilities (path helpers, cache freshness).
///
/// Not exposed
pub(crate) mod io;

pub use error::{Result, ShiinaError};
