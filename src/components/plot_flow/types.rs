use serde::Deserialize;

use crate::data;

/// One row of the movie dataset as exported.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MovieRecord {
	pub movie: String,
	#[serde(default)]
	pub group: String,
	#[serde(deserialize_with = "data::number")]
	pub year: f64,
	#[serde(default, deserialize_with = "data::tag_list")]
	pub flows_into: Vec<String>,
	#[serde(default, deserialize_with = "data::tag_list")]
	pub characters: Vec<String>,
	#[serde(default, deserialize_with = "data::tag_list")]
	pub post_creds: Vec<String>,
	#[serde(default, deserialize_with = "data::optional_number")]
	pub x: Option<f64>,
	#[serde(default, deserialize_with = "data::optional_number")]
	pub y: Option<f64>,
}

/// A movie box with its derived layout fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Movie {
	pub title: String,
	pub group: String,
	pub year: f64,
	pub flows_into: Vec<String>,
	/// Always contains `group`.
	pub characters: Vec<String>,
	pub post_credits: Vec<String>,
	/// Rank among movies of the same year, in input order.
	pub year_count: usize,
	pub year_total: usize,
	/// `(year_count + 1) / max(year_total)`.
	pub all_frac: f64,
	pub x: Option<f64>,
	pub y: Option<f64>,
}

impl From<MovieRecord> for Movie {
	fn from(record: MovieRecord) -> Self {
		let mut characters = record.characters;
		if !characters.contains(&record.group) {
			characters.push(record.group.clone());
		}
		Self {
			title: record.movie,
			group: record.group,
			year: record.year,
			flows_into: record.flows_into,
			characters,
			post_credits: record.post_creds,
			year_count: 0,
			year_total: 0,
			all_frac: 0.0,
			x: record.x,
			y: record.y,
		}
	}
}

impl Movie {
	/// Canonical ordering key. Only unambiguous while `year_count < 100`.
	pub fn order_key(&self) -> f64 {
		self.year * 100.0 + self.year_count as f64
	}

	pub fn features(&self, tag: &str) -> bool {
		self.characters.iter().any(|c| c == tag)
	}

	pub fn has_post_credits(&self, tag: &str) -> bool {
		self.post_credits.iter().any(|c| c == tag)
	}

	pub fn field(&self, field: Field) -> Option<f64> {
		let v = match field {
			Field::Year => Some(self.year),
			Field::AllFrac => Some(self.all_frac),
			Field::X => self.x,
			Field::Y => self.y,
		};
		v.filter(|v| !v.is_nan())
	}
}

/// Directed flow between two movies, as indices into the canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
	pub source: usize,
	pub target: usize,
}

/// Positioning fields a layout can read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
	Year,
	AllFrac,
	X,
	Y,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutMode {
	#[default]
	Timeline,
	Branching,
}

impl LayoutMode {
	/// `(x field, y field)` used for positioning.
	pub fn active_fields(self) -> (Field, Field) {
		match self {
			Self::Timeline => (Field::Year, Field::AllFrac),
			Self::Branching => (Field::X, Field::Y),
		}
	}

	pub fn toggled(self) -> Self {
		match self {
			Self::Timeline => Self::Branching,
			Self::Branching => Self::Timeline,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
	Arrowhead,
	Selected,
}

impl Marker {
	pub fn id(self) -> &'static str {
		match self {
			Self::Arrowhead => "arrowhead",
			Self::Selected => "selected",
		}
	}

	pub fn url(self) -> String {
		format!("url(#{})", self.id())
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	pub fill: String,
	pub stroke: String,
	pub stroke_width: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
	pub stroke: String,
	pub stroke_width: f64,
	pub marker: Marker,
}

/// Why the diagram is being redrawn; picks the transition timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Redraw {
	/// First paint.
	Enter,
	/// Layout mode or size changed.
	Relayout,
	/// Only colors changed.
	Restyle,
	/// The container changed size; jump to the new positions.
	Resize,
}
