use serde::{Deserialize, Serialize};

/// Value used by the analyser for an attribute that does not apply.
pub const UNSPECIFIED: &str = "*";

/// Part-of-speech of nouns (名詞).
pub const NOUN: &str = "名詞";

/// Part-of-speech of verbs (動詞).
pub const VERB: &str = "動詞";

/// Whether the analyser found the word in its dictionary.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WordType {
	#[default]
	Known,
	Unknown,
}

/// One tagged word occurrence, as produced by morphological analysis.
///
/// Morphemes come from an external analyser and are only ever copied into
/// the indices, never mutated. Field names follow the analyser's JSON output
/// so that stored corpora can be read back as-is; attributes missing from
/// the input default to [`UNSPECIFIED`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Morpheme {
	/// Literal text of the word.
	#[serde(default)]
	pub surface_form: String,
	/// Top-level grammatical category (e.g. 名詞, 助詞).
	#[serde(default = "unspecified")]
	pub pos: String,
	#[serde(default = "unspecified")]
	pub pos_detail_1: String,
	#[serde(default = "unspecified")]
	pub pos_detail_2: String,
	#[serde(default = "unspecified")]
	pub pos_detail_3: String,
	#[serde(default = "unspecified")]
	pub conjugated_type: String,
	#[serde(default = "unspecified")]
	pub conjugated_form: String,
	/// Dictionary form.
	#[serde(default = "unspecified")]
	pub basic_form: String,
	#[serde(default = "unspecified")]
	pub reading: String,
	#[serde(default = "unspecified")]
	pub pronunciation: String,
	#[serde(default)]
	pub word_type: WordType,
	#[serde(default)]
	pub word_id: u64,
	/// 1-based character position in the analysed text.
	#[serde(default)]
	pub word_position: u64,
}

fn unspecified() -> String {
	UNSPECIFIED.to_owned()
}

impl Morpheme {
	/// Creates a known-word morpheme with every optional attribute unspecified.
	///
	/// The base form defaults to the surface form.
	pub fn new(surface_form: &str, pos: &str) -> Self {
		Self {
			surface_form: surface_form.to_owned(),
			pos: pos.to_owned(),
			pos_detail_1: unspecified(),
			pos_detail_2: unspecified(),
			pos_detail_3: unspecified(),
			conjugated_type: unspecified(),
			conjugated_form: unspecified(),
			basic_form: surface_form.to_owned(),
			reading: unspecified(),
			pronunciation: unspecified(),
			word_type: WordType::Known,
			word_id: 0,
			word_position: 0,
		}
	}

	/// Sets the three part-of-speech sub-categories.
	pub fn with_details(mut self, detail_1: &str, detail_2: &str, detail_3: &str) -> Self {
		self.pos_detail_1 = detail_1.to_owned();
		self.pos_detail_2 = detail_2.to_owned();
		self.pos_detail_3 = detail_3.to_owned();
		self
	}

	/// Sets the conjugation class, conjugation form and dictionary form.
	pub fn with_conjugation(mut self, conjugated_type: &str, conjugated_form: &str, basic_form: &str) -> Self {
		self.conjugated_type = conjugated_type.to_owned();
		self.conjugated_form = conjugated_form.to_owned();
		self.basic_form = basic_form.to_owned();
		self
	}

	/// Sets reading and pronunciation.
	pub fn with_reading(mut self, reading: &str, pronunciation: &str) -> Self {
		self.reading = reading.to_owned();
		self.pronunciation = pronunciation.to_owned();
		self
	}

	/// Marks the morpheme as inferred by the analyser rather than looked up.
	pub fn unknown(mut self) -> Self {
		self.word_type = WordType::Unknown;
		self
	}

	pub fn is_known(&self) -> bool {
		self.word_type == WordType::Known
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_missing_attributes_default_to_unspecified() {
		let json = r#"{"surface_form": "都", "pos": "名詞", "pos_detail_1": "接尾", "feeling": -0.5}"#;
		let morpheme: Morpheme = serde_json::from_str(json).unwrap();

		assert_eq!(morpheme.pos_detail_1, "接尾");
		assert_eq!(morpheme.pos_detail_2, UNSPECIFIED);
		assert_eq!(morpheme.conjugated_form, UNSPECIFIED);
		assert!(morpheme.is_known());
	}

	#[test]
	fn test_word_type_uses_analyser_spelling() {
		let json = r#"{"surface_form": "ほげ", "pos": "名詞", "word_type": "UNKNOWN"}"#;
		let morpheme: Morpheme = serde_json::from_str(json).unwrap();
		assert!(!morpheme.is_known());

		let encoded = serde_json::to_string(&Morpheme::new("猫", NOUN)).unwrap();
		assert!(encoded.contains(r#""word_type":"KNOWN""#));
	}
}
