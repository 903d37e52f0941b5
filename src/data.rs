//! Dataset loading and the lenient field coercions the datasets need.
//!
//! The source spreadsheets were exported with every cell as a string, so
//! numeric fields accept either a JSON number or a numeric string. Anything
//! else coerces to `NaN` instead of failing the whole dataset.

use serde::{Deserialize, Deserializer};

use crate::components::ability_matrix::CharacterRecord;
use crate::components::plot_flow::MovieRecord;
use crate::config::VisConfig;
use crate::error::{VisError, VisResult};

const CHARACTERS_JSON: &str = include_str!("../assets/data/characters.json");
const MOVIES_JSON: &str = include_str!("../assets/data/movies.json");
const CONFIG_JSON: &str = include_str!("../assets/config.json");

/// Character rows shipped with the app.
pub fn bundled_characters() -> VisResult<Vec<CharacterRecord>> {
	parse_dataset("characters", CHARACTERS_JSON)
}

/// Movie rows shipped with the app.
pub fn bundled_movies() -> VisResult<Vec<MovieRecord>> {
	parse_dataset("movies", MOVIES_JSON)
}

/// Built-in settings with the shipped overlay applied.
pub fn bundled_config() -> VisResult<VisConfig> {
	let config = VisConfig::from_json(CONFIG_JSON)?;
	log::info!("Loaded config with {} tooltip rules", config.tooltip_rules.len());
	Ok(config)
}

pub fn parse_dataset<T: for<'de> Deserialize<'de>>(
	name: &'static str,
	json: &str,
) -> VisResult<Vec<T>> {
	let rows: Vec<T> =
		serde_json::from_str(json).map_err(|source| VisError::Dataset { name, source })?;
	log::info!("Loaded {} {} rows", rows.len(), name);
	Ok(rows)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberLike {
	Number(f64),
	Text(String),
	Bool(bool),
	Null(()),
}

impl NumberLike {
	fn coerce(self) -> f64 {
		match self {
			Self::Number(n) => n,
			Self::Text(s) => {
				let s = s.trim();
				if s.is_empty() {
					0.0
				} else {
					s.parse().unwrap_or(f64::NAN)
				}
			}
			Self::Bool(b) => f64::from(u8::from(b)),
			Self::Null(()) => 0.0,
		}
	}
}

/// Coerces a number or numeric string, `NaN` when neither.
pub fn number<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
	Ok(NumberLike::deserialize(de).map(NumberLike::coerce).unwrap_or(f64::NAN))
}

/// Like [`number`] but a missing, null or non-numeric value becomes `None`.
pub fn optional_number<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
	let value = Option::<NumberLike>::deserialize(de)
		.ok()
		.flatten()
		.map(NumberLike::coerce);
	Ok(value.filter(|v| !v.is_nan()))
}

/// Ability flags: any nonzero number is set, `NaN` is unset.
pub fn flag<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
	let v = number(de)?;
	Ok(v != 0.0 && !v.is_nan())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListLike {
	List(Vec<String>),
	Text(String),
}

/// A tag list given either as a JSON array or as comma separated text.
pub fn tag_list<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
	let list = match Option::<ListLike>::deserialize(de)? {
		Some(ListLike::List(items)) => items
			.into_iter()
			.map(|s| s.trim().to_string())
			.filter(|s| !s.is_empty())
			.collect(),
		Some(ListLike::Text(text)) => split_list(&text),
		None => Vec::new(),
	};
	Ok(list)
}

/// Splits `"a, b,,c"` into `["a", "b", "c"]`.
pub fn split_list(text: &str) -> Vec<String> {
	text.split(',')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(String::from)
		.collect()
}
