use std::thread;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::corpus::CorpusFile;
use crate::error::{Result, ShiinaError};
use crate::io::{build_output_path, is_up_to_date};
use super::adjacency::AdjacencyIndex;
use super::morpheme::Morpheme;
use super::structure::StructureIndex;
use super::vocabulary::VocabularyIndex;

/// Everything learned from the registered sentences.
///
/// This struct bundles:
/// - `vocabulary`: every morpheme, for attribute-filtered sampling
/// - `structures`: one skeleton per sentence
/// - `adjacency`: successors of every surface form
/// - `sentences`: how many sentences were registered
///
/// All indices grow together through [`Dictionary::register`] and are
/// queryable right after each call; nothing is ever pruned.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Dictionary {
	vocabulary: VocabularyIndex,
	structures: StructureIndex,
	adjacency: AdjacencyIndex,
	sentences: usize,
}

impl Dictionary {
	pub fn new() -> Self {
		Self::default()
	}

	/// Feeds one tokenized sentence to every index.
	pub fn register(&mut self, sentence: &[Morpheme]) {
		self.vocabulary.register(sentence);
		self.structures.register(sentence);
		self.adjacency.register(sentence);
		self.sentences += 1;
	}

	pub fn vocabulary(&self) -> &VocabularyIndex {
		&self.vocabulary
	}

	pub fn structures(&self) -> &StructureIndex {
		&self.structures
	}

	pub fn adjacency(&self) -> &AdjacencyIndex {
		&self.adjacency
	}

	/// Number of registered sentences.
	pub fn len(&self) -> usize {
		self.sentences
	}

	pub fn is_empty(&self) -> bool {
		self.sentences == 0
	}

	/// Merges another dictionary into this one.
	///
	/// `other`'s observations are appended after this dictionary's, so
	/// merging partial dictionaries in input order gives the same result as
	/// registering every sentence sequentially.
	pub fn merge(&mut self, other: &Self) {
		self.vocabulary.merge(&other.vocabulary);
		self.structures.merge(&other.structures);
		self.adjacency.merge(&other.adjacency);
		self.sentences += other.sentences;
	}

	/// Builds a dictionary from many sentences using worker threads.
	///
	/// # Behavior
	/// - Splits input into chunks (based on CPU cores * factor).
	/// - Builds one partial dictionary per chunk on a scoped thread.
	/// - Merges partial dictionaries in chunk order.
	///
	/// # Errors
	/// Returns [`ShiinaError::ThreadPanic`] if a worker panicked.
	pub fn import_parallel(sentences: &[Vec<Morpheme>]) -> Result<Self> {
		let cpus = num_cpus::get();
		let factor = 8;
		let chunk_size = sentences.len().div_ceil(cpus * factor).max(1);

		thread::scope(|scope| {
			let workers: Vec<_> = sentences
				.chunks(chunk_size)
				.map(|chunk| {
					scope.spawn(move || {
						let mut partial = Dictionary::new();
						for sentence in chunk {
							partial.register(sentence);
						}
						partial
					})
				})
				.collect();

			let mut dictionary = Dictionary::new();
			for worker in workers {
				let partial = worker.join().map_err(|_| ShiinaError::ThreadPanic)?;
				dictionary.merge(&partial);
			}

			info!("Imported {} sentences ({} morphemes)", dictionary.len(), dictionary.vocabulary.len());
			Ok(dictionary)
		})
	}

	/// Loads the dictionary learned from `corpus`.
	///
	/// - Uses the binary cache next to the corpus (`.bin`) when it is at
	///   least as recent as the corpus file and was built from a corpus of
	///   the same byte length.
	/// - Otherwise reads the corpus, builds the dictionary in parallel and
	///   rewrites the cache with `postcard`.
	///
	/// The cache stores the corpus length next to the dictionary, so
	/// sentences appended within the same mtime tick still force a rebuild.
	/// A cache that cannot be decoded is discarded and rebuilt.
	pub fn load(corpus: &CorpusFile) -> Result<Self> {
		let cache_path = build_output_path(corpus.path(), "bin")?;
		let corpus_size = corpus.size()?;

		if is_up_to_date(&cache_path, corpus.path()) {
			let bytes = std::fs::read(&cache_path)?;
			match postcard::from_bytes::<(u64, Self)>(&bytes) {
				Ok((cached_size, dictionary)) if cached_size == corpus_size => {
					info!("Loaded {} sentences from cache {}", dictionary.len(), cache_path.display());
					return Ok(dictionary);
				}
				Ok((cached_size, _)) => info!(
					"Cache {} covers {cached_size} bytes of a {corpus_size} byte corpus, rebuilding",
					cache_path.display()
				),
				Err(e) => warn!("Discarding unreadable cache {}: {e}", cache_path.display()),
			}
		}

		let sentences = corpus.read_sentences()?;
		let dictionary = Self::import_parallel(&sentences)?;

		let bytes = postcard::to_stdvec(&(corpus_size, &dictionary))?;
		std::fs::write(&cache_path, bytes)?;
		debug!("Wrote cache {}", cache_path.display());

		Ok(dictionary)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn corpus() -> Vec<Vec<Morpheme>> {
		(0..50)
			.map(|i| {
				vec![
					Morpheme::new(&format!("語{i}"), "名詞"),
					Morpheme::new("が", "助詞"),
					Morpheme::new(&format!("動{}", i % 7), "動詞"),
				]
			})
			.collect()
	}

	#[test]
	fn test_register_grows_every_index() {
		let mut dictionary = Dictionary::new();
		let sentence = &corpus()[0];
		dictionary.register(sentence);

		assert_eq!(dictionary.len(), 1);
		assert_eq!(dictionary.vocabulary().len(), 3);
		assert_eq!(dictionary.structures().len(), 1);
		assert_eq!(dictionary.adjacency().lookup("語0").len(), 1);
	}

	#[test]
	fn test_parallel_import_matches_sequential() {
		let sentences = corpus();
		let mut sequential = Dictionary::new();
		for sentence in &sentences {
			sequential.register(sentence);
		}

		let parallel = Dictionary::import_parallel(&sentences).unwrap();
		assert_eq!(parallel, sequential);
	}

	#[test]
	fn test_parallel_import_of_nothing() {
		let dictionary = Dictionary::import_parallel(&[]).unwrap();
		assert!(dictionary.is_empty());
	}

	#[test]
	fn test_binary_round_trip_keeps_contents() {
		let dictionary = Dictionary::import_parallel(&corpus()).unwrap();
		let bytes = postcard::to_stdvec(&dictionary).unwrap();
		let decoded: Dictionary = postcard::from_bytes(&bytes).unwrap();
		assert_eq!(decoded, dictionary);
	}
}
