use leptos::prelude::*;

use super::render::{MatrixLayout, render};
use super::state::AbilityMatrix;
use super::types::{Ability, CharacterRecord, SortField, Stat};
use crate::components::svg_layer::{SceneEvent, SvgLayer, SvgRenderer};
use crate::components::tooltip::Detail;
use crate::config::{IconSet, VisConfig};
use crate::renderer::{Layer, fmt_num};

const LAYERS: [Layer; 3] = [Layer::MatrixCells, Layer::MatrixLabels, Layer::MatrixPortraits];

struct MatrixVis {
	matrix: AbilityMatrix,
	layout: MatrixLayout,
	icons: IconSet,
	renderer: SvgRenderer,
}

impl MatrixVis {
	fn redraw(&mut self) {
		render(&self.matrix, &self.layout, &self.icons, &mut self.renderer);
	}

	fn sort(&mut self, field: &str) {
		match self.matrix.sort_by(field) {
			Ok(()) => self.redraw(),
			Err(err) => log::warn!("{err}"),
		}
	}
}

fn ignore(_: SceneEvent) {}

#[component]
pub fn AbilityMatrixView(
	#[prop(into)] data: Signal<Vec<CharacterRecord>>,
	#[prop(optional)] config: VisConfig,
	detail: WriteSignal<Option<Detail>>,
) -> impl IntoView {
	let layout = MatrixLayout::new(config.matrix.clone());
	let renderer = SvgRenderer::new(&LAYERS);
	let (cells, labels, portraits) = (
		renderer.scene(Layer::MatrixCells),
		renderer.scene(Layer::MatrixLabels),
		renderer.scene(Layer::MatrixPortraits),
	);
	let vis = StoredValue::new(MatrixVis {
		matrix: AbilityMatrix::default(),
		layout: layout.clone(),
		icons: config.icons,
		renderer,
	});
	let columns = RwSignal::new(0usize);
	let sorted = RwSignal::new(None::<SortField>);

	Effect::new(move |_| {
		let records = data.get();
		columns.set(records.len());
		sorted.set(None);
		vis.update_value(|v| {
			v.matrix = AbilityMatrix::new(records);
			v.redraw();
		});
	});

	let sort = move |field: &str| {
		vis.update_value(|v| v.sort(field));
		sorted.set(vis.with_value(|v| v.matrix.sorted_by()));
	};

	let on_portrait = move |event: SceneEvent| match event {
		SceneEvent::Enter { key, x, y } => {
			let shown = vis.with_value(|v| v.matrix.show_detail(&key, x, y));
			detail.set(shown.and_then(|e| e.into_detail()));
		}
		SceneEvent::Leave { .. } => {
			detail.set(vis.with_value(|v| v.matrix.hide_detail()).into_detail());
		}
		SceneEvent::Click { key } => log::debug!("Character {key} clicked"),
	};

	let label_class = move |field: SortField| {
		if sorted.get() == Some(field) {
			"row_label sortable sorted"
		} else {
			"row_label sortable"
		}
	};
	let stat_buttons = Stat::ALL
		.into_iter()
		.map(|stat| {
			let class = move || {
				if sorted.get() == Some(SortField::Stat(stat)) {
					"stat-sort sorted"
				} else {
					"stat-sort"
				}
			};
			view! {
				<button class=class on:click=move |_| sort(stat.key())>
					{stat.label()}
				</button>
			}
		})
		.collect_view();
	let (width_layout, label_x, power_y) = (layout.clone(), layout.label_x(), layout.power_y());
	let row_labels = Ability::ALL
		.into_iter()
		.map(|ability| {
			let y = layout.row_y(ability) + layout.geometry.cell_size / 2.0;
			view! {
				<text
					class=move || label_class(SortField::Ability(ability))
					x=fmt_num(label_x)
					y=fmt_num(y)
					text-anchor="end"
					dominant-baseline="middle"
					on:click=move |_| sort(ability.key())
				>
					{ability.label()}
				</text>
			}
		})
		.collect_view();

	view! {
		<div class="matrix-vis">
			<div class="stat-sorts">"Sort by stat: " {stat_buttons}</div>
			<svg
				width=move || fmt_num(width_layout.width(columns.get()))
				height=fmt_num(layout.height())
			>
				<g class="row-labels">
					<text
						class=move || label_class(SortField::Power)
						x=fmt_num(label_x)
						y=fmt_num(power_y)
						text-anchor="end"
						dominant-baseline="middle"
						on:click=move |_| sort("power")
					>
						"Power"
					</text>
					{row_labels}
				</g>
				<SvgLayer scene=cells on_event=ignore />
				<SvgLayer scene=labels on_event=ignore />
				<SvgLayer scene=portraits on_event=on_portrait />
			</svg>
		</div>
	}
}
