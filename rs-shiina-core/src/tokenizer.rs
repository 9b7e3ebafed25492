//! Seam towards the external morphological analyser.
//!
//! The crate does not analyse text itself; callers plug an analyser in by
//! implementing [`Tokenize`].

use crate::error::Result;
use crate::model::morpheme::Morpheme;

/// Sentence terminator (句点).
const FULL_STOP: char = '。';

/// A morphological analyser.
pub trait Tokenize {
	/// Analyses one sentence into its ordered morphemes.
	fn tokenize(&self, text: &str) -> Result<Vec<Morpheme>>;

	/// Analyses a multi-sentence text, one result per sentence.
	///
	/// Sentences are split with [`split_sentences`].
	fn tokenize_lines(&self, text: &str) -> Result<Vec<Vec<Morpheme>>> {
		split_sentences(text)
			.into_iter()
			.map(|sentence| self.tokenize(sentence))
			.collect()
	}
}

/// Splits text on line breaks and on 「。」, which stays with its sentence.
///
/// Surrounding whitespace is trimmed and empty pieces are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
	let mut sentences = Vec::new();
	let mut start = 0;
	for (index, c) in text.char_indices() {
		match c {
			FULL_STOP => {
				let end = index + c.len_utf8();
				push_trimmed(&mut sentences, &text[start..end]);
				start = end;
			}
			'\n' => {
				push_trimmed(&mut sentences, &text[start..index]);
				start = index + 1;
			}
			_ => {}
		}
	}
	push_trimmed(&mut sentences, &text[start..]);

	sentences
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, piece: &'a str) {
	let piece = piece.trim();
	if !piece.is_empty() {
		sentences.push(piece);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Splits on spaces and tags everything as a noun.
	struct SpaceTokenizer;

	impl Tokenize for SpaceTokenizer {
		fn tokenize(&self, text: &str) -> Result<Vec<Morpheme>> {
			Ok(text.split_whitespace().map(|word| Morpheme::new(word, "名詞")).collect())
		}
	}

	#[test]
	fn test_split_keeps_full_stop() {
		let sentences = split_sentences("今日は晴れ。明日は雨。\r\n明後日は");
		assert_eq!(sentences, ["今日は晴れ。", "明日は雨。", "明後日は"]);
	}

	#[test]
	fn test_split_ignores_blank_lines() {
		assert_eq!(split_sentences("\n\n おはよう \n"), ["おはよう"]);
		assert!(split_sentences("").is_empty());
	}

	#[test]
	fn test_tokenize_lines_uses_split() {
		let sentences = SpaceTokenizer.tokenize_lines("a b。c\nd e").unwrap();
		let lengths: Vec<usize> = sentences.iter().map(Vec::len).collect();
		assert_eq!(lengths, [2, 1, 2]);
	}
}
