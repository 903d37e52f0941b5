use crate::config::{IconSet, MatrixGeometry};
use crate::renderer::{Anchor, ElementSpec, Layer, Renderer, Shape, Transition, bind, fmt_num};

use super::state::AbilityMatrix;
use super::types::{Ability, CharacterRecord};

const EMPTY_CELL: &str = "lightgrey";
const REORDER: Transition = Transition {
	delay_ms: 0,
	duration_ms: 1000,
};

/// Pixel layout of the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct MatrixLayout {
	pub geometry: MatrixGeometry,
}

impl MatrixLayout {
	pub fn new(geometry: MatrixGeometry) -> Self {
		Self { geometry }
	}

	/// Left edge of column `j`; column 0 leaves room for the row labels.
	pub fn column_x(&self, j: usize) -> f64 {
		let g = &self.geometry;
		g.margin.left + g.column_pitch * (j as f64 + 3.0)
	}

	pub fn power_y(&self) -> f64 {
		let g = &self.geometry;
		g.margin.top + g.portrait_size + 14.0
	}

	/// Top edge of the row for `ability`.
	pub fn row_y(&self, ability: Ability) -> f64 {
		let g = &self.geometry;
		g.margin.top + g.portrait_size + 28.0 + g.row_pitch * ability.index() as f64
	}

	pub fn label_x(&self) -> f64 {
		self.column_x(0) - 10.0
	}

	pub fn width(&self, columns: usize) -> f64 {
		self.column_x(columns) + self.geometry.margin.right
	}

	pub fn height(&self) -> f64 {
		self.row_y(Ability::AcquiredPower) + self.geometry.row_pitch + self.geometry.margin.bottom
	}
}

/// Cell key for `(character, ability)`.
pub fn cell_key(name: &str, ability: Ability) -> String {
	format!("{}:{}", name, ability.key())
}

/// Pushes the current column order to the renderer.
pub fn render(matrix: &AbilityMatrix, layout: &MatrixLayout, icons: &IconSet, renderer: &mut impl Renderer) {
	let g = &layout.geometry;
	let characters = matrix.characters();

	let portraits = bind(
		characters,
		|c| c.name.clone(),
		|c, j| {
			ElementSpec::new(Shape::Image)
				.at(layout.column_x(j) - (g.portrait_size - g.cell_size) / 2.0, g.margin.top)
				.size(g.portrait_size, g.portrait_size)
				.href(icons.character(&c.name))
				.class("portrait")
				.transition(REORDER)
		},
	);
	renderer.reconcile(Layer::MatrixPortraits, portraits);

	let powers = bind(
		characters,
		|c| c.name.clone(),
		|c, j| {
			let label = if c.power.is_finite() {
				fmt_num(c.power)
			} else {
				"?".into()
			};
			ElementSpec::new(Shape::Text)
				.at(layout.column_x(j) + g.cell_size / 2.0, layout.power_y())
				.text(vec![label])
				.font(13.0, Anchor::Middle)
				.class("power-label")
				.transition(REORDER)
		},
	);
	renderer.reconcile(Layer::MatrixLabels, powers);

	let cells = characters
		.iter()
		.enumerate()
		.flat_map(|(j, c)| Ability::ALL.into_iter().map(move |a| (j, c, a)))
		.map(|(j, c, a)| cell(layout, icons, j, c, a))
		.collect();
	renderer.reconcile(Layer::MatrixCells, cells);
}

fn cell(
	layout: &MatrixLayout,
	icons: &IconSet,
	j: usize,
	character: &CharacterRecord,
	ability: Ability,
) -> ElementSpec {
	let g = &layout.geometry;
	let (x, y) = (layout.column_x(j), layout.row_y(ability));
	let spec = if character.has(ability) {
		let inset = (g.icon_size - g.cell_size) / 2.0;
		ElementSpec::new(Shape::Image)
			.at(x - inset, y - inset)
			.size(g.icon_size, g.icon_size)
			.href(icons.ability(ability))
	} else {
		ElementSpec::new(Shape::Rect)
			.at(x, y)
			.size(g.cell_size, g.cell_size)
			.fill(EMPTY_CELL)
	};
	spec.keyed(cell_key(&character.name, ability))
		.transition(REORDER)
}
