use serde::{Deserialize, Serialize};

use crate::error::{Result, ShiinaError};
use super::morpheme::{Morpheme, NOUN, UNSPECIFIED, VERB};

/// Default hard cap on generated tokens.
pub const DEFAULT_MAX_TOKENS: usize = 200;

/// Strategy used to walk the learned data when synthesizing a sentence.
///
/// # Variants
/// - `Structured`: follow a skeleton; closed-class slots are copied
///   verbatim, open-class slots are resampled from the vocabulary with the
///   same attributes, preferring words seen after the previous one.
/// - `Tagged`: follow a skeleton's part-of-speech tags only, asking the
///   adjacency index for a successor with each tag in turn.
/// - `Free`: ignore skeletons and chain successors until none is known or
///   the token cap is reached.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
	#[default]
	Structured,
	Tagged,
	Free,
}

/// Input parameters for generating one sentence.
///
/// # Responsibilities
/// - Carry the seed word, the optional skeleton and the walking strategy
/// - Carry the open-class set used by `Structured` mode
/// - Keep the token cap strictly positive
///
/// # Invariants
/// - `max_tokens` is always >= 1
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationInput {
	/// Word the sentence starts with. Empty means start of sentence.
	pub seed: String,

	/// Skeleton to follow. Drawn from the learned structures when `None`.
	pub skeleton: Option<Vec<Morpheme>>,

	pub mode: GenerationMode,

	/// Parts of speech resampled in `Structured` mode.
	pub open_classes: Vec<String>,

	/// Maximum number of generated tokens, the seed excluded.
	max_tokens: usize,
}

impl Default for GenerationInput {
	fn default() -> Self {
		Self {
			seed: String::new(),
			skeleton: None,
			mode: GenerationMode::default(),
			open_classes: vec![NOUN.to_owned(), VERB.to_owned()],
			max_tokens: DEFAULT_MAX_TOKENS,
		}
	}
}

impl GenerationInput {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_seed(mut self, seed: &str) -> Self {
		self.seed = seed.to_owned();
		self
	}

	pub fn with_skeleton(mut self, skeleton: Vec<Morpheme>) -> Self {
		self.skeleton = Some(skeleton);
		self
	}

	pub fn with_mode(mut self, mode: GenerationMode) -> Self {
		self.mode = mode;
		self
	}

	/// Returns the current token cap.
	pub fn max_tokens(&self) -> usize {
		self.max_tokens
	}

	/// Sets the token cap.
	///
	/// # Errors
	/// Returns [`ShiinaError::InvalidTokenCap`] for 0.
	pub fn set_max_tokens(&mut self, max_tokens: usize) -> Result<()> {
		if max_tokens == 0 {
			return Err(ShiinaError::InvalidTokenCap);
		}
		self.max_tokens = max_tokens;
		Ok(())
	}

	/// Returns `true` if `pos` is resampled in `Structured` mode.
	pub fn is_open_class(&self, pos: &str) -> bool {
		self.open_classes.iter().any(|open| open == pos)
	}

	/// Checks a caller-supplied skeleton before any index is touched.
	///
	/// # Errors
	/// Returns [`ShiinaError::InvalidSkeleton`] for a slot whose
	/// part-of-speech is blank or left as [`UNSPECIFIED`].
	pub(crate) fn validate(&self) -> Result<()> {
		if let Some(skeleton) = &self.skeleton {
			let missing = |pos: &str| {
				let pos = pos.trim();
				pos.is_empty() || pos == UNSPECIFIED
			};
			if let Some(index) = skeleton.iter().position(|slot| missing(&slot.pos)) {
				return Err(ShiinaError::InvalidSkeleton { index });
			}
		}
		Ok(())
	}
}
