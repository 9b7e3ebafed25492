//! Top-level module for the learning dictionary.
//!
//! This module provides:
//! - The analysed word record (`Morpheme`) and its attribute filter
//! - The three indices (`VocabularyIndex`, `StructureIndex`, `AdjacencyIndex`)
//! - Their bundle (`Dictionary`)
//! - Generation configuration (`GenerationInput`)
//! - The high-level generation interface (`Generator`)

/// One analysed word occurrence.
pub mod morpheme;

/// Typed attribute predicate over morphemes.
pub mod filter;

/// Append-only list of every registered morpheme, queried by attributes.
pub mod vocabulary;

/// Grammatical skeletons of registered sentences.
pub mod structure;

/// Successors of every surface form, the sentence start included.
pub mod adjacency;

/// Bundle of the three indices.
///
/// Supports merging, parallel import and a binary cache on disk.
pub mod dictionary;

/// Generation configuration: seed, skeleton, mode and token cap.
pub mod generation_input;

/// High-level interface for learning sentences and synthesizing new ones.
pub mod generator;

/// Compound proper-noun detection over analysed sentences.
pub mod propers;
