use leptos::prelude::*;

/// Hover payload for the floating detail box.
#[derive(Clone, Debug, PartialEq)]
pub struct Detail {
	pub title: String,
	pub body: Option<String>,
	pub x: f64,
	pub y: f64,
}

/// What a visualization asks of the tooltip.
#[derive(Clone, Debug, PartialEq)]
pub enum DetailEvent {
	Show(Detail),
	Hide,
}

impl DetailEvent {
	pub fn into_detail(self) -> Option<Detail> {
		match self {
			Self::Show(detail) => Some(detail),
			Self::Hide => None,
		}
	}
}

/// Floating box that follows the last `DetailEvent::Show`.
#[component]
pub fn Tooltip(#[prop(into)] detail: Signal<Option<Detail>>) -> impl IntoView {
	let style = move || match detail.get() {
		Some(d) => format!(
			"position: absolute; left: {}px; top: {}px; opacity: 0.8; transition: opacity 200ms;",
			d.x,
			d.y + 10.0
		),
		None => "position: absolute; opacity: 0; pointer-events: none; transition: opacity 100ms;"
			.into(),
	};

	view! {
		<div class="tooltip" style=style>
			{move || {
				detail
					.get()
					.map(|d| {
						view! {
							<h4>{d.title}</h4>
							{d.body.map(|body| view! { <p>{body}</p> })}
						}
					})
			}}
		</div>
	}
}
