//! Error type shared by every part of the crate.
//!
//! Sparse data (an unseen word, an empty filter result, an empty index) is
//! never reported through this type: those conditions surface as `None` or
//! as an empty collection. Only malformed input and I/O failures do.

/// Crate-wide result alias, defaulting to [`ShiinaError`].
pub type Result<T, E = ShiinaError> = std::result::Result<T, E>;

/// Errors raised by the dictionary, the generator and the corpus store.
#[derive(Debug, thiserror::Error)]
pub enum ShiinaError {
	/// A filter key that names no morpheme attribute.
	#[error("Unknown morpheme attribute '{0}'")]
	UnknownAttribute(String),

	/// A part-of-speech tag that no registered morpheme carries.
	#[error("Part-of-speech '{0}' has no registered vocabulary")]
	UnknownPartOfSpeech(String),

	/// A caller-supplied skeleton slot without a part-of-speech.
	#[error("Skeleton slot {index} has an empty part-of-speech")]
	InvalidSkeleton { index: usize },

	/// A generation token cap of zero.
	#[error("max_tokens must be greater than 0")]
	InvalidTokenCap,

	/// A worker thread of a parallel import panicked.
	#[error("Background import thread panicked")]
	ThreadPanic,

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Postcard(#[from] postcard::Error),
}

impl ShiinaError {
	/// Returns `true` when the error was caused by the caller's input
	/// rather than by the environment.
	pub fn is_invalid_input(&self) -> bool {
		matches!(
			self,
			Self::UnknownAttribute(_)
				| Self::UnknownPartOfSpeech(_)
				| Self::InvalidSkeleton { .. }
				| Self::InvalidTokenCap
		)
	}
}
