use leptos::prelude::*;
use leptos::task::spawn_local;

use super::graph_canvas::{GraphCanvas, GraphData};
use crate::actions::AppActions;
use crate::graph::GraphStats;
use crate::state::{GraphStore, Notifications};

/// The interactive graph plus its overlays.
#[component]
pub fn GraphView() -> impl IntoView {
	let graph = expect_context::<GraphStore>();
	let notes = expect_context::<Notifications>();
	let actions = expect_context::<AppActions>();
	let state = graph.state();
	let connecting = RwSignal::new(false);

	let data = Memo::new(move |_| state.with(|s| GraphData::from_users(&s.users)));
	let selected = Signal::derive(move || state.with(|s| s.selected_user_id.clone()));
	let stats = Memo::new(move |_| state.with(|s| GraphStats::from_users(&s.users)));
	let dragging = move || state.with(|s| s.dragging_hobby.clone());

	let on_select = Callback::new(move |id: String| graph.set_selected_user(Some(id)));

	let on_connect = {
		let actions = actions.clone();
		Callback::new(move |(source, target): (String, String)| {
			let actions = actions.clone();
			spawn_local(async move {
				actions.link_users(&source, &target).await;
			});
		})
	};

	let on_hobby_drop = Callback::new(move |target: Option<String>| {
		let hobby = state.with_untracked(|s| s.dragging_hobby.clone());
		graph.set_dragging_hobby(None);
		let Some(hobby) = hobby else {
			return;
		};
		let Some(user_id) = target else {
			notes.warning("Drop hobby on a user node");
			return;
		};
		let actions = actions.clone();
		spawn_local(async move {
			actions.add_hobby(&user_id, &hobby).await;
		});
	});

	view! {
		<div class="graph-view">
			<GraphCanvas
				data=data
				selected=selected
				on_select=on_select
				on_connect=on_connect
				on_hobby_drop=on_hobby_drop
				connecting=connecting
			/>

			<div class="overlay overlay-top-left fade-in">
				<h3>"How to Connect Users"</h3>
				<ul>
					<li>"Drag from a node's handle to another node"</li>
					<li>"Or drag a node onto another one"</li>
					<li>"Drag hobbies from the sidebar onto users"</li>
				</ul>
			</div>

			<div class="overlay overlay-top-right fade-in">
				<h3>"Graph Statistics"</h3>
				<dl>
					<dt>"Users"</dt>
					<dd>{move || stats.get().users}</dd>
					<dt>"Connections"</dt>
					<dd>{move || stats.get().connections}</dd>
					<dt>"Popular users"</dt>
					<dd>{move || stats.get().popular}</dd>
					<dt>"Avg. score"</dt>
					<dd>{move || format!("{:.1}", stats.get().average_score)}</dd>
				</dl>
			</div>

			<Show when=move || dragging().is_some()>
				<div class="overlay overlay-bottom hint-hobby fade-in">
					{move || dragging().map(|h| format!("Drop \"{h}\" on a user node"))}
				</div>
			</Show>
			<Show when=move || connecting.get()>
				<div class="overlay overlay-bottom hint-connect fade-in">
					"Drag to another node to connect"
				</div>
			</Show>
		</div>
	}
}
