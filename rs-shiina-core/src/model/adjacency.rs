use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::morpheme::Morpheme;

/// Key standing for "start of sentence".
pub const SENTENCE_START: &str = "";

/// Observed "what follows this word" relation.
///
/// Conceptually a Markov chain of order one over surface forms, where each
/// outgoing edge is stored once per observation instead of being counted.
///
/// ## Responsibilities:
/// - Record, for every token, the surface form that preceded it
/// - Return all recorded successors of a surface form
/// - Merge with another index (ex. parallel import support)
///
/// ## Invariants
/// - Each list keeps insertion order
/// - The first token of a sentence is recorded under [`SENTENCE_START`]
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct AdjacencyIndex {
	/// Successors indexed by the preceding surface form.
	/// Example: { "" => [北園], "北園" => [高校] }
	successors: HashMap<String, Vec<Morpheme>>,
}

impl AdjacencyIndex {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records every (predecessor, token) pair of `sentence`.
	pub fn register(&mut self, sentence: &[Morpheme]) {
		let mut previous = SENTENCE_START;
		for token in sentence {
			self.successors
				.entry(previous.to_owned())
				.or_default()
				.push(token.clone());
			previous = token.surface_form.as_str();
		}
	}

	/// Returns every morpheme observed right after `surface_form`.
	///
	/// An empty slice means no continuation is known.
	pub fn lookup(&self, surface_form: &str) -> &[Morpheme] {
		self.successors
			.get(surface_form)
			.map(Vec::as_slice)
			.unwrap_or_default()
	}

	/// Number of distinct predecessors (the sentinel included).
	pub fn len(&self) -> usize {
		self.successors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.successors.is_empty()
	}

	/// Appends the successors recorded in `other` to this index.
	pub fn merge(&mut self, other: &Self) {
		for (key, successors) in &other.successors {
			self.successors
				.entry(key.clone())
				.or_default()
				.extend_from_slice(successors);
		}
	}
}
