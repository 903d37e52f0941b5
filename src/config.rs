//! Injected lookup tables and geometry for both visualizations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::components::ability_matrix::Ability;
use crate::error::{VisError, VisResult};

/// Used for tags the palette does not know.
pub const FALLBACK_COLOR: &str = "#7f7f7f";

const HERO_COLORS: &[(&str, &str)] = &[
	("avengers", "#f78f3f"),
	("iron_man", "#c0392b"),
	("captain_america", "#2e5fa3"),
	("thor", "#8e9aaf"),
	("hulk", "#4caf50"),
	("black_widow", "#2c2c2c"),
	("hawkeye", "#7d3c98"),
	("guardians", "#e84393"),
	("ant_man", "#b03a2e"),
	("doctor_strange", "#e67e22"),
	("spider_man", "#d62728"),
	("black_panther", "#5b2c6f"),
	("captain_marvel", "#1f77b4"),
	("nick_fury", "#34495e"),
];

/// Tag → display color (`heroColors`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Palette(BTreeMap<String, String>);

impl Default for Palette {
	fn default() -> Self {
		Self(
			HERO_COLORS
				.iter()
				.map(|(tag, color)| (tag.to_string(), color.to_string()))
				.collect(),
		)
	}
}

impl Palette {
	pub fn get(&self, tag: &str) -> Option<&str> {
		self.0.get(tag).map(String::as_str)
	}

	/// Color for `tag`, or [`FALLBACK_COLOR`].
	pub fn color(&self, tag: &str) -> &str {
		self.get(tag).unwrap_or(FALLBACK_COLOR)
	}
}

/// Image paths for ability glyphs and character portraits.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IconSet {
	pub ability_dir: String,
	pub character_dir: String,
	pub info: String,
}

impl Default for IconSet {
	fn default() -> Self {
		Self {
			ability_dir: "img/attributes".into(),
			character_dir: "img/characters".into(),
			info: "img/other/info.svg".into(),
		}
	}
}

impl IconSet {
	pub fn ability(&self, ability: Ability) -> String {
		format!("{}/{}.svg", self.ability_dir, ability.icon_stem())
	}

	/// Portrait for a character name or group tag: `"Iron Man"` → `iron_man.svg`.
	pub fn character(&self, name: &str) -> String {
		format!("{}/{}.svg", self.character_dir, tag_of(name))
	}
}

/// `"Captain America"` → `"captain_america"`.
pub fn tag_of(name: &str) -> String {
	name.split(|c: char| !c.is_alphanumeric())
		.filter(|s| !s.is_empty())
		.map(str::to_lowercase)
		.collect::<Vec<_>>()
		.join("_")
}

/// `"captain_america"` → `"Captain America"`.
pub fn title_case(tag: &str) -> String {
	tag.split('_')
		.filter(|s| !s.is_empty())
		.map(|word| {
			let mut chars = word.chars();
			match chars.next() {
				Some(first) => first.to_uppercase().chain(chars).collect(),
				None => String::new(),
			}
		})
		.collect::<Vec<_>>()
		.join(" ")
}

/// Explanatory text shown when `tag` is selected and `movie` is hovered.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TooltipRule {
	pub tag: String,
	pub movie: String,
	pub text: String,
}

fn default_tooltip_rules() -> Vec<TooltipRule> {
	vec![TooltipRule {
		tag: "spider_man".into(),
		movie: "Iron Man 2".into(),
		text: "Spiderman shows up as a child here and is saved by Iron Man. Look it up on YouTube!"
			.into(),
	}]
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Margin {
	pub top: f64,
	pub right: f64,
	pub bottom: f64,
	pub left: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlotFlowGeometry {
	pub margin: Margin,
	pub rect_width: f64,
	pub rect_height: f64,
	/// Plot height as a fraction of plot width.
	pub aspect: f64,
}

impl Default for PlotFlowGeometry {
	fn default() -> Self {
		Self {
			margin: Margin {
				top: 10.0,
				right: 40.0,
				bottom: 120.0,
				left: 40.0,
			},
			rect_width: 80.0,
			rect_height: 35.0,
			aspect: 0.26,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatrixGeometry {
	pub margin: Margin,
	pub column_pitch: f64,
	pub row_pitch: f64,
	pub cell_size: f64,
	pub icon_size: f64,
	pub portrait_size: f64,
}

impl Default for MatrixGeometry {
	fn default() -> Self {
		Self {
			margin: Margin {
				top: 0.0,
				right: 40.0,
				bottom: 40.0,
				left: 40.0,
			},
			column_pitch: 40.0,
			row_pitch: 31.0,
			cell_size: 25.0,
			icon_size: 35.0,
			portrait_size: 40.0,
		}
	}
}

/// Everything the visualizations take from outside their datasets.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VisConfig {
	pub palette: Palette,
	pub icons: IconSet,
	pub tooltip_rules: Vec<TooltipRule>,
	pub plot_flow: PlotFlowGeometry,
	pub matrix: MatrixGeometry,
}

impl Default for VisConfig {
	fn default() -> Self {
		Self {
			palette: Palette::default(),
			icons: IconSet::default(),
			tooltip_rules: default_tooltip_rules(),
			plot_flow: PlotFlowGeometry::default(),
			matrix: MatrixGeometry::default(),
		}
	}
}

impl VisConfig {
	/// Overlays a JSON document on the defaults. Absent keys keep their
	/// default value; a present `palette` replaces the built-in one.
	pub fn from_json(json: &str) -> VisResult<Self> {
		serde_json::from_str(json).map_err(VisError::Config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn palette_falls_back_for_unknown_tags() {
		let palette = Palette::default();
		assert_eq!(palette.color("hulk"), "#4caf50");
		assert_eq!(palette.color("howard_the_duck"), FALLBACK_COLOR);
	}

	#[test]
	fn overlay_keeps_unset_defaults() {
		let config = VisConfig::from_json(r#"{"plot_flow": {"rect_width": 100}}"#).unwrap();
		assert_eq!(config.plot_flow.rect_width, 100.0);
		assert_eq!(config.plot_flow.rect_height, 35.0);
		assert_eq!(config.tooltip_rules.len(), 1);
		assert_eq!(config.palette, Palette::default());
	}

	#[test]
	fn overlay_rejects_bad_json() {
		assert!(matches!(
			VisConfig::from_json("{"),
			Err(VisError::Config(_))
		));
	}

	#[test]
	fn tag_and_title_conversions() {
		assert_eq!(tag_of("Captain America"), "captain_america");
		assert_eq!(tag_of("Spider-Man"), "spider_man");
		assert_eq!(title_case("doctor_strange"), "Doctor Strange");
		assert_eq!(title_case("reset"), "Reset");
	}

	#[test]
	fn icon_paths() {
		let icons = IconSet::default();
		assert_eq!(icons.ability(Ability::Intelligence), "img/attributes/brain.svg");
		assert_eq!(icons.character("Iron Man"), "img/characters/iron_man.svg");
	}
}
