use leptos::prelude::*;

use crate::components::ability_matrix::AbilityMatrixView;
use crate::components::plot_flow::PlotFlowDiagram;
use crate::components::tooltip::{Detail, Tooltip};
use crate::data;
use crate::error::VisResult;

/// Both visualizations over the bundled datasets, sharing one tooltip.
fn atlas(set_detail: WriteSignal<Option<Detail>>) -> VisResult<impl IntoView> {
	let config = data::bundled_config()?;
	let characters = Signal::stored(data::bundled_characters()?);
	let movies = Signal::stored(data::bundled_movies()?);

	Ok(view! {
		<section class="ability-matrix">
			<h2>"Who can do what"</h2>
			<p class="subtitle">"Click \"Power\", an ability or a stat to sort the heroes."</p>
			<AbilityMatrixView data=characters config=config.clone() detail=set_detail />
		</section>
		<section class="plot-flow">
			<h2>"How the stories flow"</h2>
			<p class="subtitle">"Pick a hero to follow them through the films."</p>
			<PlotFlowDiagram data=movies config=config detail=set_detail />
		</section>
	})
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (detail, set_detail) = signal(None::<Detail>);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<div class="atlas">
				<h1>"Hero Atlas"</h1>
				{move || atlas(set_detail)}
				<Tooltip detail=detail />
			</div>
		</ErrorBoundary>
	}
}
