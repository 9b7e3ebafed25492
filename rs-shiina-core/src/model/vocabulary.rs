use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::filter::MorphemeFilter;
use super::morpheme::Morpheme;

/// Picks one candidate uniformly at random.
///
/// Returns `None` for an empty slice; callers treat that as the end of
/// whatever they were building.
pub fn sample_uniform<'a, T, R>(candidates: &'a [T], rng: &mut R) -> Option<&'a T>
where
	R: Rng + ?Sized,
{
	candidates.choose(rng)
}

/// Every morpheme ever registered, in registration order.
///
/// Duplicates are kept: a word seen ten times is ten times as likely to be
/// sampled as a word seen once.
///
/// ## Invariants
/// - Append-only; nothing is ever removed or reordered
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct VocabularyIndex {
	words: Vec<Morpheme>,
}

impl VocabularyIndex {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends every morpheme of `sentence`, in order.
	pub fn register(&mut self, sentence: &[Morpheme]) {
		self.words.extend_from_slice(sentence);
	}

	/// Returns every morpheme matching `filter`, in registration order.
	///
	/// An empty result is a normal outcome.
	pub fn filter(&self, filter: &MorphemeFilter) -> Vec<&Morpheme> {
		self.words.iter().filter(|word| filter.matches(word)).collect()
	}

	/// Returns `true` if at least one registered morpheme has part-of-speech `pos`.
	pub fn contains_pos(&self, pos: &str) -> bool {
		self.words.iter().any(|word| word.pos == pos)
	}

	/// Uniformly samples one morpheme matching `filter`.
	///
	/// A wildcard filter samples straight from the whole vocabulary.
	pub fn pick<R: Rng + ?Sized>(&self, filter: &MorphemeFilter, rng: &mut R) -> Option<&Morpheme> {
		if filter.is_wildcard() {
			return sample_uniform(&self.words, rng);
		}
		sample_uniform(&self.filter(filter), rng).copied()
	}

	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Morpheme> {
		self.words.iter()
	}

	/// Appends the words of `other` after this index's words.
	pub fn merge(&mut self, other: &Self) {
		self.words.extend_from_slice(&other.words);
	}
}
