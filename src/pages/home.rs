use leptos::prelude::*;
use leptos::task::spawn_local;
use thiserror::Error;

use crate::actions::AppActions;
use crate::components::graph_view::GraphView;
use crate::components::loading::{ErrorFallback, LoadingSpinner};
use crate::components::notifications::NotificationContainer;
use crate::components::sidebar::Sidebar;
use crate::components::top_bar::TopBar;
use crate::components::user_management::UserManagementPanel;
use crate::state::{GraphState, GraphStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Body {
	Loading,
	Graph,
}

/// The first load failed and there is nothing to show.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{0}")]
struct LoadFailed(String);

/// Picks what the graph area shows. The spinner is only for the first load,
/// so later writes that raise `loading` never swap the canvas out.
fn graph_body(state: &GraphState, settled: bool) -> Result<Body, LoadFailed> {
	if !settled {
		return Ok(Body::Loading);
	}
	match &state.error {
		Some(err) if state.users.is_empty() => Err(LoadFailed(err.clone())),
		_ => Ok(Body::Graph),
	}
}

/// The graph workspace: top bar, sidebar, canvas and user management.
#[component]
pub fn Home() -> impl IntoView {
	let graph = expect_context::<GraphStore>();
	let actions = expect_context::<AppActions>();
	let state = graph.state();
	let sidebar_open = RwSignal::new(true);
	let manage_open = RwSignal::new(false);

	let settled = RwSignal::new(false);

	spawn_local(async move {
		actions.load_graph().await;
		settled.set(true);
	});

	let body = Memo::new(move |_| state.with(|s| graph_body(s, settled.get())));

	view! {
		<div class="app">
			<TopBar on_menu_click=Callback::new(move |()| sidebar_open.update(|o| *o = !*o)) />
			<main class="workspace">
				<Show when=move || sidebar_open.get()>
					<Sidebar />
				</Show>
				<section class="graph-area">
					<ErrorBoundary fallback=|errors| view! { <ErrorFallback errors=errors /> }>
						{move || {
							body.get()
								.map(|body| match body {
									Body::Loading => {
										view! { <LoadingSpinner text="Loading graph data..." /> }
											.into_any()
									}
									Body::Graph => view! { <GraphView /> }.into_any(),
								})
						}}
					</ErrorBoundary>
				</section>
			</main>
			<button
				class="fab"
				title="Manage users"
				on:click=move |_| manage_open.set(true)
			>
				"+"
			</button>
			<UserManagementPanel
				visible=manage_open
				on_close=Callback::new(move |()| manage_open.set(false))
			/>
			<NotificationContainer />
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::tests::user;

	#[test]
	fn spinner_only_before_first_load_settles() {
		let state = GraphState::default();
		assert_eq!(graph_body(&state, false), Ok(Body::Loading));
	}

	#[test]
	fn creating_first_user_keeps_canvas_mounted() {
		// Empty graph with a write in flight: still the graph, never the spinner.
		let state = GraphState {
			loading: true,
			..GraphState::default()
		};
		assert_eq!(graph_body(&state, true), Ok(Body::Graph));
	}

	#[test]
	fn failed_empty_load_is_an_error() {
		let state = GraphState {
			loading: false,
			error: Some("Failed to fetch graph data".into()),
			..GraphState::default()
		};
		let err = graph_body(&state, true).unwrap_err();
		assert_eq!(err.to_string(), "Failed to fetch graph data");
	}

	#[test]
	fn users_on_screen_outrank_a_stale_error() {
		let state = GraphState {
			users: vec![user("a", &[], &[])],
			loading: false,
			error: Some("Failed to fetch graph data".into()),
			..GraphState::default()
		};
		assert_eq!(graph_body(&state, true), Ok(Body::Graph));
	}
}
