use serde::{Deserialize, Serialize};

use super::morpheme::{Morpheme, NOUN};

const SYMBOL: &str = "記号";
const BLANK: &str = "空白";
const SUFFIX: &str = "接尾";

/// How a proper-noun candidate was delimited.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProperKind {
	/// Nouns closed by a suffix noun (東京 + 都), or a noun run reaching the
	/// end of the sentence.
	SuffixBounded,
	/// Nouns interrupted by a non-noun: two or more nouns (北園 + 高校), or a
	/// single word the analyser did not know.
	NounRun,
}

/// A compound noun found in a sentence.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProperNoun {
	pub kind: ProperKind,
	pub word: String,
}

impl ProperNoun {
	fn new(kind: ProperKind, tokens: &[Morpheme]) -> Self {
		Self {
			kind,
			word: tokens.iter().map(|token| token.surface_form.as_str()).collect(),
		}
	}
}

/// Finds runs of consecutive nouns that likely form one proper noun.
///
/// A blank symbol between two nouns continues the run.
///
/// 北園高校は東京都板橋区にあります。
/// > 北園 + 高校
/// > 東京 + 都(接尾)
/// > 板橋 + 区(接尾)
pub fn detect_propers(sentence: &[Morpheme]) -> Vec<ProperNoun> {
	let mut propers = Vec::new();
	let mut run = 0;

	for (index, token) in sentence.iter().enumerate() {
		let previous = index.checked_sub(1).map(|i| &sentence[i]);
		let next = sentence.get(index + 1);

		let in_run = token.pos == NOUN
			|| (token.pos == SYMBOL && token.pos_detail_1 == BLANK && previous.is_some_and(|p| p.pos == NOUN));

		if in_run {
			let closed_by_suffix = token.pos_detail_1 == SUFFIX && next.is_some_and(|n| n.pos_detail_1 != SUFFIX);
			let at_end = index + 1 == sentence.len();

			if run > 0 && (closed_by_suffix || at_end) {
				propers.push(ProperNoun::new(ProperKind::SuffixBounded, &sentence[index - run..=index]));
				run = 0;
			} else {
				run += 1;
			}
		} else {
			if run > 1 || (run == 1 && !sentence[index - 1].is_known()) {
				propers.push(ProperNoun::new(ProperKind::NounRun, &sentence[index - run..index]));
			}
			run = 0;
		}
	}

	propers
}
