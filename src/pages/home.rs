use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_query_map;
use log::error;

use crate::components::bubble_chart::{
	BubbleChart, BubbleChartState, ChartConfig, ChartError, LayoutMode, RawRow, fetch_rows,
};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	// `?width=1200&height=800&threshold=500` resize or re-filter the chart
	let query = use_query_map();
	let config = query.with_untracked(|q| ChartConfig::default().with_overrides(|key| q.get(key)));

	let rows = RwSignal::new(None::<Result<Vec<RawRow>, ChartError>>);
	let path = config.dataset_path.clone();
	spawn_local(async move {
		let loaded = fetch_rows(&path).await;
		if let Err(e) = &loaded {
			error!("{e}");
		}
		rows.set(Some(loaded));
	});

	let active = RwSignal::new(LayoutMode::Grouped.trigger_id());
	let mode = RwSignal::new(LayoutMode::Grouped);
	let toggle = move |id: &'static str| {
		active.set(id);
		mode.set(LayoutMode::from_trigger_id(id));
	};

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

			<div class="container">
				<h1>"Popular tweets"</h1>
				<div id="toolbar" class="btn-group">
					{LayoutMode::ALL
						.into_iter()
						.map(|m| {
							let id = m.trigger_id();
							view! {
								<button
									id=id
									class="button"
									class:active=move || active.get() == id
									on:click=move |_| toggle(id)
								>
									{m.label()}
								</button>
							}
						})
						.collect_view()}
				</div>
				<div id="vis">
					{move || match rows.get() {
						None => view! { <p class="loading">"Loading tweets..."</p> }.into_any(),
						Some(loaded) => {
							loaded
								.and_then(|rows| {
									let seed = js_sys::Date::now() as u64;
									BubbleChartState::new(&rows, config.clone(), seed)
								})
								.map(|state| view! { <BubbleChart state=state mode=mode /> })
								.into_any()
						}
					}}
				</div>
			</div>
		</ErrorBoundary>
	}
}
