use rand::Rng;
use serde::{Deserialize, Serialize};

use super::morpheme::Morpheme;
use super::vocabulary::sample_uniform;

/// Grammatical skeletons of every registered sentence.
///
/// Each entry keeps the full morphemes of one sentence so that function
/// words can be copied verbatim at generation time. The index only supports
/// uniform sampling; insertion order carries no meaning.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct StructureIndex {
	skeletons: Vec<Vec<Morpheme>>,
}

impl StructureIndex {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `sentence` as one new skeleton.
	pub fn register(&mut self, sentence: &[Morpheme]) {
		self.skeletons.push(sentence.to_vec());
	}

	/// Returns one stored skeleton chosen uniformly at random, or `None`
	/// if nothing was registered yet.
	pub fn sample_skeleton<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&[Morpheme]> {
		sample_uniform(&self.skeletons, rng).map(Vec::as_slice)
	}

	pub fn len(&self) -> usize {
		self.skeletons.len()
	}

	pub fn is_empty(&self) -> bool {
		self.skeletons.is_empty()
	}

	pub fn merge(&mut self, other: &Self) {
		self.skeletons.extend(other.skeletons.iter().cloned());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn test_empty_index_has_no_skeleton() {
		let mut rng = StdRng::seed_from_u64(0);
		assert!(StructureIndex::new().sample_skeleton(&mut rng).is_none());
	}

	#[test]
	fn test_skeleton_preserves_sentence_order() {
		let mut rng = StdRng::seed_from_u64(0);
		let mut structures = StructureIndex::new();
		structures.register(&[Morpheme::new("雨", "名詞"), Morpheme::new("だ", "助動詞")]);

		let skeleton = structures.sample_skeleton(&mut rng).unwrap();
		let tags: Vec<&str> = skeleton.iter().map(|token| token.pos.as_str()).collect();
		assert_eq!(tags, ["名詞", "助動詞"]);
		assert_eq!(structures.len(), 1);
	}
}
