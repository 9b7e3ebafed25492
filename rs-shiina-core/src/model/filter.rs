use serde::{Deserialize, Serialize};

use crate::error::{Result, ShiinaError};
use super::morpheme::Morpheme;

/// Attribute predicate over morphemes.
///
/// Every field is a wildcard when `None`. A morpheme matches when each
/// specified field equals the morpheme's attribute of the same name.
///
/// # Example
/// ```
/// use rs_shiina_core::model::filter::MorphemeFilter;
/// use rs_shiina_core::model::morpheme::Morpheme;
///
/// let suffix = Morpheme::new("都", "名詞").with_details("接尾", "地域", "*");
/// let filter = MorphemeFilter::new().pos("名詞").pos_detail_1("接尾");
/// assert!(filter.matches(&suffix));
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct MorphemeFilter {
	#[serde(default)]
	pub pos: Option<String>,
	#[serde(default)]
	pub pos_detail_1: Option<String>,
	#[serde(default)]
	pub pos_detail_2: Option<String>,
	#[serde(default)]
	pub pos_detail_3: Option<String>,
	#[serde(default)]
	pub conjugated_type: Option<String>,
	#[serde(default)]
	pub conjugated_form: Option<String>,
}

impl MorphemeFilter {
	/// Creates a filter matching every morpheme.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates the filter used to fill one skeleton slot: same part-of-speech,
	/// sub-categories and conjugation form as `slot`.
	pub fn slot_of(slot: &Morpheme) -> Self {
		Self {
			pos: Some(slot.pos.clone()),
			pos_detail_1: Some(slot.pos_detail_1.clone()),
			pos_detail_2: Some(slot.pos_detail_2.clone()),
			pos_detail_3: Some(slot.pos_detail_3.clone()),
			conjugated_type: None,
			conjugated_form: Some(slot.conjugated_form.clone()),
		}
	}

	pub fn pos(mut self, value: &str) -> Self {
		self.pos = Some(value.to_owned());
		self
	}

	pub fn pos_detail_1(mut self, value: &str) -> Self {
		self.pos_detail_1 = Some(value.to_owned());
		self
	}

	pub fn pos_detail_2(mut self, value: &str) -> Self {
		self.pos_detail_2 = Some(value.to_owned());
		self
	}

	pub fn pos_detail_3(mut self, value: &str) -> Self {
		self.pos_detail_3 = Some(value.to_owned());
		self
	}

	pub fn conjugated_type(mut self, value: &str) -> Self {
		self.conjugated_type = Some(value.to_owned());
		self
	}

	pub fn conjugated_form(mut self, value: &str) -> Self {
		self.conjugated_form = Some(value.to_owned());
		self
	}

	/// Sets the attribute named `key` to `value`.
	///
	/// Keys use the analyser's attribute names (`pos`, `pos_detail_1`, ...).
	///
	/// # Errors
	/// Returns [`ShiinaError::UnknownAttribute`] if `key` names no filterable
	/// attribute.
	pub fn with_attribute(mut self, key: &str, value: &str) -> Result<Self> {
		let slot = match key {
			"pos" => &mut self.pos,
			"pos_detail_1" => &mut self.pos_detail_1,
			"pos_detail_2" => &mut self.pos_detail_2,
			"pos_detail_3" => &mut self.pos_detail_3,
			"conjugated_type" => &mut self.conjugated_type,
			"conjugated_form" => &mut self.conjugated_form,
			_ => return Err(ShiinaError::UnknownAttribute(key.to_owned())),
		};
		*slot = Some(value.to_owned());
		Ok(self)
	}

	/// Builds a filter from `(key, value)` pairs, failing on the first
	/// unknown key.
	pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
	where
		I: IntoIterator<Item = (&'a str, &'a str)>,
	{
		pairs
			.into_iter()
			.try_fold(Self::new(), |filter, (key, value)| filter.with_attribute(key, value))
	}

	/// Returns `true` if no attribute is constrained.
	pub fn is_wildcard(&self) -> bool {
		*self == Self::default()
	}

	pub fn matches(&self, morpheme: &Morpheme) -> bool {
		fn check(expected: &Option<String>, actual: &str) -> bool {
			expected.as_deref().is_none_or(|expected| expected == actual)
		}

		check(&self.pos, &morpheme.pos)
			&& check(&self.pos_detail_1, &morpheme.pos_detail_1)
			&& check(&self.pos_detail_2, &morpheme.pos_detail_2)
			&& check(&self.pos_detail_3, &morpheme.pos_detail_3)
			&& check(&self.conjugated_type, &morpheme.conjugated_type)
			&& check(&self.conjugated_form, &morpheme.conjugated_form)
	}
}
