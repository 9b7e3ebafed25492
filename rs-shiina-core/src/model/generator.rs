use std::borrow::Cow;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::corpus::CorpusFile;
use crate::error::{Result, ShiinaError};
use crate::tokenizer::Tokenize;
use super::adjacency::SENTENCE_START;
use super::dictionary::Dictionary;
use super::filter::MorphemeFilter;
use super::generation_input::{GenerationInput, GenerationMode};
use super::morpheme::Morpheme;
use super::vocabulary::sample_uniform;

/// A synthesized sentence.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Generated {
	/// Seed followed by every generated surface form, without separators.
	pub text: String,
	/// Generated morphemes, the seed excluded.
	pub tokens: Vec<Morpheme>,
}

/// Learns sentence structure from tokenized text and recombines it.
///
/// # Responsibilities
/// - Own the learned [`Dictionary`] and feed it registered sentences
/// - Answer "what plausibly follows this word" queries
/// - Synthesize sentences by walking learned skeletons
///
/// All randomness comes from the source given at construction, so a seeded
/// source makes every query reproducible.
#[derive(Debug)]
pub struct Generator<R = StdRng> {
	dictionary: Dictionary,
	rng: R,
}

impl Generator<StdRng> {
	/// Creates an empty generator seeded from the operating system.
	pub fn new() -> Self {
		Self::with_rng(StdRng::from_os_rng())
	}

	/// Creates a generator from everything stored in `corpus`.
	///
	/// # Errors
	/// Returns an error if the corpus or its cache cannot be read.
	pub fn from_corpus(corpus: &CorpusFile) -> Result<Self> {
		Ok(Self::with_dictionary(Dictionary::load(corpus)?, StdRng::from_os_rng()))
	}
}

impl Default for Generator<StdRng> {
	fn default() -> Self {
		Self::new()
	}
}

impl<R: Rng> Generator<R> {
	/// Creates an empty generator drawing randomness from `rng`.
	pub fn with_rng(rng: R) -> Self {
		Self::with_dictionary(Dictionary::new(), rng)
	}

	pub fn with_dictionary(dictionary: Dictionary, rng: R) -> Self {
		Self { dictionary, rng }
	}

	pub fn dictionary(&self) -> &Dictionary {
		&self.dictionary
	}

	/// Learns one tokenized sentence. Queries see it immediately.
	pub fn register(&mut self, sentence: &[Morpheme]) {
		self.dictionary.register(sentence);
		debug!("Registered sentence #{} ({} morphemes)", self.dictionary.len(), sentence.len());
	}

	/// Registers every sentence in order and returns how many were registered.
	pub fn import<I>(&mut self, sentences: I) -> usize
	where
		I: IntoIterator,
		I::Item: AsRef<[Morpheme]>,
	{
		let mut count = 0;
		for sentence in sentences {
			self.dictionary.register(sentence.as_ref());
			count += 1;
		}
		info!("Imported {count} sentences, {} known in total", self.dictionary.len());
		count
	}

	/// Tokenizes `text` sentence by sentence and registers every non-empty
	/// result.
	pub fn learn<T: Tokenize + ?Sized>(&mut self, tokenizer: &T, text: &str) -> Result<usize> {
		let sentences = tokenizer.tokenize_lines(text)?;
		Ok(self.import(sentences.iter().filter(|sentence| !sentence.is_empty())))
	}

	/// Picks a morpheme that plausibly follows `word`.
	///
	/// # Behavior
	/// - Looks up the successors of `word` (empty string: start of sentence).
	/// - Without `tag`, borrows the tag of a random successor.
	/// - Returns a random successor with that tag; from the start of a
	///   sentence, a random vocabulary word with that tag instead.
	///
	/// Returns `Ok(None)` when nothing fits.
	///
	/// # Errors
	/// Returns [`ShiinaError::UnknownPartOfSpeech`] if `tag` is carried by no
	/// registered morpheme although vocabulary exists.
	pub fn next(&mut self, word: &str, tag: Option<&str>) -> Result<Option<Morpheme>> {
		if let Some(tag) = tag {
			self.check_tag(tag)?;
		}
		Ok(self.next_unchecked(word, tag))
	}

	/// Synthesizes a sentence in `Structured` mode.
	///
	/// Draws a learned skeleton when `skeleton` is `None`. On an empty
	/// generator this returns `seed` unchanged.
	pub fn generate(&mut self, seed: &str, skeleton: Option<&[Morpheme]>) -> Result<String> {
		let mut input = GenerationInput::new().with_seed(seed);
		input.skeleton = skeleton.map(<[Morpheme]>::to_vec);
		Ok(self.generate_with(&input)?.text)
	}

	/// Synthesizes a sentence according to `input`.
	///
	/// Generation stops early, keeping whatever was produced, as soon as a
	/// slot cannot be filled. At most `input.max_tokens()` tokens follow the
	/// seed whatever the shape of the learned data.
	///
	/// # Errors
	/// Fails before touching any index if the supplied skeleton is malformed
	/// or names a part-of-speech with no registered vocabulary.
	pub fn generate_with(&mut self, input: &GenerationInput) -> Result<Generated> {
		input.validate()?;
		if let Some(skeleton) = &input.skeleton {
			for slot in skeleton {
				if input.mode == GenerationMode::Tagged || input.is_open_class(&slot.pos) {
					self.check_tag(&slot.pos)?;
				}
			}
		}

		let cap = input.max_tokens();
		let mut tokens: Vec<Morpheme> = Vec::new();
		let mut last = input.seed.clone();

		match input.mode {
			GenerationMode::Free => {
				while tokens.len() < cap {
					let Some(chosen) = self.next_unchecked(&last, None) else { break };
					last.clone_from(&chosen.surface_form);
					tokens.push(chosen);
				}
			}
			GenerationMode::Structured | GenerationMode::Tagged => {
				let skeleton: Cow<'_, [Morpheme]> = match &input.skeleton {
					Some(skeleton) => Cow::Borrowed(skeleton),
					None => self
						.dictionary
						.structures()
						.sample_skeleton(&mut self.rng)
						.map(|skeleton| Cow::Owned(skeleton.to_vec()))
						.unwrap_or_default(),
				};

				for slot in skeleton.iter().take(cap) {
					let chosen = match input.mode {
						GenerationMode::Tagged => self.next_unchecked(&last, Some(&slot.pos)),
						_ => self.fill_slot(&last, slot, input),
					};
					let Some(chosen) = chosen else {
						debug!("No candidate for '{}' after '{last}', stopping", slot.pos);
						break;
					};
					last.clone_from(&chosen.surface_form);
					tokens.push(chosen);
				}
			}
		}

		let text = std::iter::once(input.seed.as_str())
			.chain(tokens.iter().map(|token| token.surface_form.as_str()))
			.collect();

		Ok(Generated { text, tokens })
	}

	/// Rejects a tag that no registered morpheme carries.
	///
	/// An empty vocabulary is sparse data, not a mistake, and passes.
	fn check_tag(&self, tag: &str) -> Result<()> {
		let vocabulary = self.dictionary.vocabulary();
		if tag.trim().is_empty() || (!vocabulary.is_empty() && !vocabulary.contains_pos(tag)) {
			return Err(ShiinaError::UnknownPartOfSpeech(tag.to_owned()));
		}
		Ok(())
	}

	fn next_unchecked(&mut self, word: &str, tag: Option<&str>) -> Option<Morpheme> {
		let Self { dictionary, rng } = self;

		let successors = dictionary.adjacency().lookup(word);
		if successors.is_empty() {
			return None;
		}

		let tag = match tag {
			Some(tag) => tag,
			None => sample_uniform(successors, rng)?.pos.as_str(),
		};
		let filter = MorphemeFilter::new().pos(tag);

		if word == SENTENCE_START {
			return dictionary.vocabulary().pick(&filter, rng).cloned();
		}

		let matched: Vec<&Morpheme> = successors.iter().filter(|m| filter.matches(m)).collect();
		sample_uniform(&matched, rng).map(|m| (*m).clone())
	}

	/// Fills one `Structured` skeleton slot.
	///
	/// Closed-class slots are copied as-is. Open-class slots prefer a
	/// successor of `last` with the slot's attributes and fall back to any
	/// vocabulary word with those attributes.
	fn fill_slot(&mut self, last: &str, slot: &Morpheme, input: &GenerationInput) -> Option<Morpheme> {
		if !input.is_open_class(&slot.pos) {
			return Some(slot.clone());
		}

		let Self { dictionary, rng } = self;
		let filter = MorphemeFilter::slot_of(slot);

		let successors: Vec<&Morpheme> = dictionary
			.adjacency()
			.lookup(last)
			.iter()
			.filter(|m| filter.matches(m))
			.collect();
		if let Some(word) = sample_uniform(&successors, rng) {
			return Some((*word).clone());
		}

		dictionary.vocabulary().pick(&filter, rng).cloned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::generation_input::DEFAULT_MAX_TOKENS;

	fn seeded() -> Generator {
		Generator::with_rng(StdRng::seed_from_u64(42))
	}

	fn noun(surface: &str) -> Morpheme {
		Morpheme::new(surface, "名詞").with_details("一般", "*", "*")
	}

	fn particle(surface: &str) -> Morpheme {
		Morpheme::new(surface, "助詞").with_details("格助詞", "一般", "*")
	}

	#[test]
	fn test_empty_generator_returns_seed() {
		let mut generator = seeded();
		assert_eq!(generator.generate("", None).unwrap(), "");
		assert_eq!(generator.generate("猫", None).unwrap(), "猫");
		assert_eq!(generator.next("", Some("名詞")).unwrap(), None);
	}

	#[test]
	fn test_next_of_unseen_word_is_none() {
		let mut generator = seeded();
		generator.register(&[noun("猫"), particle("が")]);
		assert_eq!(generator.next("犬", None).unwrap(), None);
		assert_eq!(generator.next("が", None).unwrap(), None);
	}

	#[test]
	fn test_next_honours_tag() {
		let mut generator = seeded();
		generator.register(&[noun("猫"), particle("が"), noun("魚")]);
		generator.register(&[noun("猫"), noun("舌")]);

		for _ in 0..20 {
			let word = generator.next("猫", Some("名詞")).unwrap().unwrap();
			assert_eq!(word.surface_form, "舌");
		}
	}

	#[test]
	fn test_next_from_sentence_start_uses_whole_vocabulary() {
		let mut generator = seeded();
		generator.register(&[noun("猫"), particle("が"), noun("魚")]);

		let mut seen = std::collections::HashSet::new();
		for _ in 0..50 {
			let word = generator.next("", None).unwrap().unwrap();
			assert_eq!(word.pos, "名詞");
			seen.insert(word.surface_form);
		}
		assert!(seen.contains("魚"));
	}

	#[test]
	fn test_unknown_tag_fails_loudly() {
		let mut generator = seeded();
		generator.register(&[noun("猫")]);

		match generator.next("猫", Some("形容詞")) {
			Err(ShiinaError::UnknownPartOfSpeech(tag)) => assert_eq!(tag, "形容詞"),
			other => panic!("unexpected result: {other:?}"),
		}
	}

	#[test]
	fn test_free_mode_is_capped_on_cycles() {
		let mut generator = seeded();
		generator.register(&[noun("あ"), noun("あ")]);

		let input = GenerationInput::new().with_mode(GenerationMode::Free);
		let generated = generator.generate_with(&input).unwrap();
		assert_eq!(generated.tokens.len(), DEFAULT_MAX_TOKENS);
		assert_eq!(generated.text, "あ".repeat(DEFAULT_MAX_TOKENS));
	}

	#[test]
	fn test_tagged_mode_is_bounded_by_skeleton() {
		let mut generator = seeded();
		generator.register(&[noun("あ"), noun("あ")]);

		let skeleton = vec![noun("x"); 5];
		let input = GenerationInput::new().with_mode(GenerationMode::Tagged).with_skeleton(skeleton);
		let generated = generator.generate_with(&input).unwrap();
		assert_eq!(generated.text, "あああああ");
	}

	#[test]
	fn test_structured_mode_copies_closed_classes() {
		let mut generator = seeded();
		generator.register(&[noun("猫"), particle("が"), noun("魚")]);
		generator.register(&[noun("犬"), particle("を"), noun("骨")]);

		for _ in 0..20 {
			let generated = generator.generate("", None).unwrap();
			let middle: String = generated.chars().nth(1).into_iter().collect();
			assert!(middle == "が" || middle == "を", "unexpected sentence {generated}");
			assert_eq!(generated.chars().count(), 3);
		}
	}

	#[test]
	fn test_cap_applies_to_skeleton_walk() {
		let mut generator = seeded();
		generator.register(&[noun("猫"), particle("が"), noun("魚")]);

		let mut input = GenerationInput::new();
		input.set_max_tokens(2).unwrap();
		assert_eq!(generator.generate_with(&input).unwrap().tokens.len(), 2);
	}

	#[test]
	fn test_empty_skeleton_slot_is_rejected() {
		let mut generator = seeded();
		let input = GenerationInput::new().with_skeleton(vec![Morpheme::new("", " ")]);
		assert!(matches!(generator.generate_with(&input), Err(ShiinaError::InvalidSkeleton { index: 0 })));
	}
}
