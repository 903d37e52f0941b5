use std::cmp::Ordering;

use crate::components::tooltip::{Detail, DetailEvent};
use crate::error::{VisError, VisResult};

use super::types::{CharacterRecord, SortField};

/// Column order and sort state of the ability matrix.
#[derive(Clone, Debug, Default)]
pub struct AbilityMatrix {
	characters: Vec<CharacterRecord>,
	sorted_by: Option<SortField>,
}

impl AbilityMatrix {
	pub fn new(characters: Vec<CharacterRecord>) -> Self {
		log::info!("Ability matrix with {} characters", characters.len());
		Self {
			characters,
			sorted_by: None,
		}
	}

	/// Characters in display order.
	pub fn characters(&self) -> &[CharacterRecord] {
		&self.characters
	}

	pub fn sorted_by(&self) -> Option<SortField> {
		self.sorted_by
	}

	/// Stable sort, descending by `field`. `NaN` values go last.
	///
	/// An unknown field leaves the order as it was.
	pub fn sort_by(&mut self, field: &str) -> VisResult<()> {
		let field = SortField::parse(field).ok_or_else(|| VisError::invalid_sort_field(field))?;
		self.characters
			.sort_by(|a, b| descending_nan_last(a.value(field), b.value(field)));
		self.sorted_by = Some(field);
		log::debug!("Matrix sorted by {}", field.name());
		Ok(())
	}

	pub fn show_detail(&self, name: &str, x: f64, y: f64) -> Option<DetailEvent> {
		let character = self.characters.iter().find(|c| c.name == name)?;
		let body = character
			.power
			.is_finite()
			.then(|| format!("Power: {}", character.power));
		Some(DetailEvent::Show(Detail {
			title: character.name.clone(),
			body,
			x,
			y,
		}))
	}

	pub fn hide_detail(&self) -> DetailEvent {
		DetailEvent::Hide
	}
}

/// Numeric comparison: `-0.0` and `0.0` are equal and keep their order.
fn descending_nan_last(a: f64, b: f64) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
		(a_nan, b_nan) => a_nan.cmp(&b_nan),
	}
}
