use leptos::prelude::*;

use super::render::{LAYERS, render, selector_tag};
use super::state::PlotFlow;
use super::types::{LayoutMode, Marker, MovieRecord, Redraw};
use crate::components::svg_layer::{SceneEvent, SvgLayer, SvgRenderer};
use crate::components::tooltip::Detail;
use crate::config::{IconSet, PlotFlowGeometry, VisConfig};
use crate::renderer::fmt_num;

const ARROW_PATH: &str = "M0,-5L10,0L0,5";
const FALLBACK_WIDTH: f64 = 960.0;

struct FlowVis {
	flow: PlotFlow,
	geometry: PlotFlowGeometry,
	icons: IconSet,
	renderer: SvgRenderer,
}

impl FlowVis {
	fn redraw(&mut self, reason: Redraw) {
		render(&self.flow, &self.geometry, &self.icons, reason, &mut self.renderer);
	}
}

/// Container width, or the fallback while the container is not laid out.
fn measured_width(client_width: i32) -> f64 {
	if client_width > 0 {
		f64::from(client_width)
	} else {
		FALLBACK_WIDTH
	}
}

fn outer_size(geometry: &PlotFlowGeometry, outer_width: f64) -> ((f64, f64), (f64, f64)) {
	let m = geometry.margin;
	let width = (outer_width - m.left - m.right).max(0.0);
	let height = width * geometry.aspect;
	((width, height), (width + m.left + m.right, height + m.top + m.bottom))
}

#[component]
pub fn PlotFlowDiagram(
	#[prop(into)] data: Signal<Vec<MovieRecord>>,
	#[prop(optional)] config: VisConfig,
	#[prop(default = None)] width: Option<f64>,
	detail: WriteSignal<Option<Detail>>,
) -> impl IntoView {
	let container = NodeRef::<leptos::html::Div>::new();
	let renderer = SvgRenderer::new(&LAYERS);
	let scenes = LAYERS.map(|layer| renderer.scene(layer));
	let vis: StoredValue<Option<FlowVis>> = StoredValue::new(None);
	let svg_size = RwSignal::new((0.0, 0.0));
	let mode = RwSignal::new(LayoutMode::Timeline);
	let marker_color = RwSignal::new(None::<String>);
	let margin = config.plot_flow.margin;
	let resize_geometry = config.plot_flow.clone();

	Effect::new(move |_| {
		let records = data.get();
		let Some(el) = container.get() else {
			return;
		};
		let outer = width.unwrap_or_else(|| measured_width(el.client_width()));
		let ((w, h), outer_dims) = outer_size(&config.plot_flow, outer);
		let mut fresh = FlowVis {
			flow: PlotFlow::new(records, &config, w, h),
			geometry: config.plot_flow.clone(),
			icons: config.icons.clone(),
			renderer: renderer.clone(),
		};
		fresh.redraw(Redraw::Enter);
		vis.set_value(Some(fresh));
		svg_size.set(outer_dims);
		mode.set(LayoutMode::Timeline);
		marker_color.set(None);
	});

	if width.is_none() {
		let handle = window_event_listener(leptos::ev::resize, move |_| {
			let Some(el) = container.get_untracked() else {
				return;
			};
			let outer = measured_width(el.client_width());
			let ((w, h), outer_dims) = outer_size(&resize_geometry, outer);
			let resized = vis
				.try_update_value(|v| {
					v.as_mut().map(|v| {
						v.flow.resize(w, h);
						v.redraw(Redraw::Resize);
					})
				})
				.flatten();
			if resized.is_some() {
				svg_size.set(outer_dims);
			}
		});
		on_cleanup(move || handle.remove());
	}

	let toggle = move |_| {
		let toggled = vis
			.try_update_value(|v| {
				v.as_mut().map(|v| {
					v.flow.toggle_branching();
					v.redraw(Redraw::Relayout);
					v.flow.mode()
				})
			})
			.flatten();
		if let Some(next) = toggled {
			mode.set(next);
		}
	};

	let on_selector = move |event: SceneEvent| {
		let restyled = vis
			.try_update_value(|v| {
				let v = v.as_mut()?;
				match &event {
					SceneEvent::Click { key } => v.flow.select(selector_tag(key)?),
					SceneEvent::Enter { key, .. } => v.flow.hover_selector(selector_tag(key)),
					SceneEvent::Leave { .. } => v.flow.hover_selector(None),
				}
				v.redraw(Redraw::Restyle);
				Some(v.flow.selected_marker_color().map(String::from))
			})
			.flatten();
		if let Some(color) = restyled {
			marker_color.set(color);
		}
	};

	let on_movie = move |event: SceneEvent| match event {
		SceneEvent::Enter { key, x, y } => {
			let text = vis.with_value(|v| {
				v.as_ref()
					.and_then(|v| v.flow.tooltip_for(&key).map(String::from))
			});
			if let Some(text) = text {
				detail.set(Some(Detail {
					title: key,
					body: Some(text),
					x,
					y,
				}));
			}
		}
		SceneEvent::Leave { .. } => detail.set(None),
		SceneEvent::Click { .. } => {}
	};
	let ignore = |_: SceneEvent| {};

	let [axis, arrows, films, titles, bubbles, selector, legend] = scenes;

	view! {
		<div class="plot-flow-vis" node_ref=container>
			<button class="toggle-branching" on:click=toggle>
				{move || match mode.get() {
					LayoutMode::Timeline => "Show how the stories branch",
					LayoutMode::Branching => "Back to the timeline",
				}}
			</button>
			<svg
				width=move || fmt_num(svg_size.get().0)
				height=move || fmt_num(svg_size.get().1)
			>
				<defs>
					<marker
						id=Marker::Arrowhead.id()
						viewBox="0 -5 10 10"
						refX="1"
						refY="0"
						markerWidth="6"
						markerHeight="6"
						orient="auto"
					>
						<path d=ARROW_PATH />
					</marker>
					<marker
						id=Marker::Selected.id()
						viewBox="0 -5 10 10"
						refX="1"
						refY="0"
						markerWidth="6"
						markerHeight="6"
						orient="auto"
					>
						<path
							d=ARROW_PATH
							transform="scale(0.25)"
							style=move || {
								marker_color
									.get()
									.map(|c| format!("stroke: {c}; fill: {c};"))
									.unwrap_or_default()
							}
						/>
					</marker>
				</defs>
				<g transform=format!("translate({},{})", fmt_num(margin.left), fmt_num(margin.top))>
					<g class="x axis">
						<SvgLayer scene=axis on_event=ignore />
					</g>
					<g class="arrows">
						<SvgLayer scene=arrows on_event=ignore />
					</g>
					<g class="films">
						<SvgLayer scene=films on_event=on_movie />
						<SvgLayer scene=titles on_event=on_movie />
						<SvgLayer scene=bubbles on_event=ignore />
					</g>
					<g class="characters">
						<SvgLayer scene=selector on_event=on_selector />
					</g>
					<g class="legend">
						<SvgLayer scene=legend on_event=ignore />
					</g>
				</g>
			</svg>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn plot_height_follows_aspect() {
		let geometry = PlotFlowGeometry::default();
		let ((w, h), (ow, oh)) = outer_size(&geometry, 1080.0);
		assert_eq!(w, 1000.0);
		assert!((h - 260.0).abs() < 1e-9);
		assert_eq!(ow, 1080.0);
		assert!((oh - 390.0).abs() < 1e-9);
	}

	#[test]
	fn unmeasured_containers_use_the_fallback_width() {
		assert_eq!(measured_width(0), FALLBACK_WIDTH);
		assert_eq!(measured_width(720), 720.0);
	}

	#[test]
	fn narrow_containers_do_not_go_negative() {
		let ((w, h), _) = outer_size(&PlotFlowGeometry::default(), 10.0);
		assert_eq!((w, h), (0.0, 0.0));
	}
}
