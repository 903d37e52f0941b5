use std::collections::HashMap;
use std::time::Duration;

use leptos::prelude::*;
use web_sys::MouseEvent;

use crate::renderer::{
	Attrs, ElementSpec, Layer, Reconciliation, Renderer, Scene, Shape, Transition, fmt_num,
};

/// Pointer interaction on a keyed element.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneEvent {
	Enter { key: String, x: f64, y: f64 },
	Leave { key: String },
	Click { key: String },
}

/// Renderer backed by one reactive [`Scene`] per layer.
#[derive(Clone, Debug)]
pub struct SvgRenderer {
	scenes: HashMap<Layer, RwSignal<Scene>>,
}

impl SvgRenderer {
	pub fn new(layers: &[Layer]) -> Self {
		Self {
			scenes: layers
				.iter()
				.map(|&layer| (layer, RwSignal::new(Scene::default())))
				.collect(),
		}
	}

	pub fn scene(&self, layer: Layer) -> RwSignal<Scene> {
		self.scenes
			.get(&layer)
			.copied()
			.unwrap_or_else(|| RwSignal::new(Scene::default()))
	}
}

impl Renderer for SvgRenderer {
	fn reconcile(&mut self, layer: Layer, elements: Vec<ElementSpec>) -> Reconciliation {
		let Some(scene) = self.scenes.get(&layer).copied() else {
			log::warn!("No scene for layer {layer:?}");
			return Reconciliation::default();
		};
		let report = scene
			.try_update(|s| s.reconcile(elements))
			.unwrap_or_default();

		if !report.entered.is_empty() {
			// Paint the entrance state for a frame before moving to the target.
			request_animation_frame(move || {
				request_animation_frame(move || {
					scene.try_update(Scene::settle);
				})
			});
		}
		if let Some(ms) = scene.with_untracked(Scene::exit_ms) {
			set_timeout(
				move || {
					scene.try_update(|s| s.sweep());
				},
				Duration::from_millis(u64::from(ms)),
			);
		}
		report
	}
}

fn opt(v: Option<f64>) -> Option<String> {
	v.map(fmt_num)
}

/// Draws a layer, forwarding pointer events by element key.
#[component]
pub fn SvgLayer<F>(scene: RwSignal<Scene>, on_event: F) -> impl IntoView
where
	F: Fn(SceneEvent) + Clone + Send + Sync + 'static,
{
	let keys = move || scene.with(|s| s.keys().map(String::from).collect::<Vec<_>>());

	view! {
		<g>
			<For each=keys key=|k| k.clone() let:key>
				<SceneElement scene=scene element_key=key on_event=on_event.clone() />
			</For>
		</g>
	}
}

#[component]
fn SceneElement<F>(scene: RwSignal<Scene>, element_key: String, on_event: F) -> impl IntoView
where
	F: Fn(SceneEvent) + Clone + Send + Sync + 'static,
{
	let key = element_key;
	let lookup = key.clone();
	let node = Memo::new(move |_| {
		scene.with(|s| {
			s.get(&lookup)
				.map(|n| (n.shown(), n.timing()))
				.unwrap_or_default()
		})
	});
	let shape = scene.with_untracked(|s| s.get(&key).map(|n| n.spec.shape));
	let attrs = move || node.with(|(a, _)| a.clone());
	let style = move || node.with(|(a, t): &(Attrs, Option<Transition>)| a.css(*t));
	let class = move || node.with(|(a, _)| a.class);

	let (enter, leave, click) = (on_event.clone(), on_event.clone(), on_event);
	let (enter_key, leave_key, click_key) = (key.clone(), key.clone(), key);
	let on_enter = move |ev: MouseEvent| {
		enter(SceneEvent::Enter {
			key: enter_key.clone(),
			x: f64::from(ev.page_x()),
			y: f64::from(ev.page_y()),
		})
	};
	let on_leave = move |_: MouseEvent| {
		leave(SceneEvent::Leave {
			key: leave_key.clone(),
		})
	};
	let on_click = move |_: MouseEvent| {
		click(SceneEvent::Click {
			key: click_key.clone(),
		})
	};

	match shape {
		Some(Shape::Rect) => view! {
			<rect
				class=class
				width=move || opt(attrs().width)
				height=move || opt(attrs().height)
				style=style
				on:mouseenter=on_enter
				on:mouseleave=on_leave
				on:click=on_click
			/>
		}
		.into_any(),
		Some(Shape::Circle) => view! {
			<circle
				class=class
				r=move || opt(attrs().radius)
				style=style
				on:mouseenter=on_enter
				on:mouseleave=on_leave
				on:click=on_click
			/>
		}
		.into_any(),
		Some(Shape::Image) => view! {
			<image
				class=class
				href=move || attrs().href
				width=move || opt(attrs().width)
				height=move || opt(attrs().height)
				style=style
				on:mouseenter=on_enter
				on:mouseleave=on_leave
				on:click=on_click
			/>
		}
		.into_any(),
		Some(Shape::Text) => view! {
			<text
				class=class
				text-anchor=move || attrs().anchor.map(|a| a.as_str())
				dominant-baseline="middle"
				style=style
				on:mouseenter=on_enter
				on:mouseleave=on_leave
				on:click=on_click
			>
				{move || {
					let lines = attrs().lines;
					let lead = -0.55 * (lines.len().saturating_sub(1)) as f64;
					lines
						.into_iter()
						.enumerate()
						.map(|(i, line)| {
							let dy = if i == 0 { lead } else { 1.1 };
							view! { <tspan x="0" dy=format!("{}em", fmt_num(dy))>{line}</tspan> }
						})
						.collect_view()
				}}
			</text>
		}
		.into_any(),
		Some(Shape::Path) => view! {
			<path
				class=class
				d=move || attrs().path
				marker-end=move || attrs().marker_end
				style=style
				on:mouseenter=on_enter
				on:mouseleave=on_leave
				on:click=on_click
			/>
		}
		.into_any(),
		None => ().into_any(),
	}
}
