use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::actions::AppActions;
use crate::graph::GraphStats;
use crate::state::GraphStore;

#[component]
pub fn TopBar(on_menu_click: Callback<()>) -> impl IntoView {
	let graph = expect_context::<GraphStore>();
	let actions = expect_context::<AppActions>();
	let state = graph.state();
	let refreshing = RwSignal::new(false);

	let stats = Memo::new(move |_| state.with(|s| GraphStats::from_users(&s.users)));

	let on_refresh = move |_| {
		if refreshing.get_untracked() {
			return;
		}
		refreshing.set(true);
		let actions = actions.clone();
		spawn_local(async move {
			actions.refresh_graph().await;
			refreshing.set(false);
		});
	};

	view! {
		<header class="top-bar slide-down">
			<div class="top-bar-left">
				<button class="icon-btn" title="Toggle sidebar" on:click=move |_| on_menu_click.run(())>
					"\u{2630}"
				</button>
				<div>
					<h1>"User Relationship Graph"</h1>
					<p class="subtitle">"Visualize and manage user connections"</p>
				</div>
			</div>
			<div class="top-bar-right">
				<div class="counts">
					<p class="strong">{move || format!("{} Users", stats.get().users)}</p>
					<p>{move || format!("{} Connections", stats.get().connections)}</p>
				</div>
				<button
					class="icon-btn"
					class:spinning=move || refreshing.get()
					title="Refresh data"
					disabled=move || refreshing.get() || state.with(|s| s.loading)
					on:click=on_refresh
				>
					"\u{21BB}"
				</button>
			</div>
		</header>
	}
}
