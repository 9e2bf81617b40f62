use leptos::ev::{DragEvent, KeyboardEvent};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::actions::AppActions;
use crate::graph::{all_hobbies, filter_hobbies, hobby_count};
use crate::state::{GraphState, GraphStore, Notifications};

const SELECT_FIRST: &str = "Please select a user first";

#[component]
fn HobbyToken(hobby: String) -> impl IntoView {
	let graph = expect_context::<GraphStore>();
	let notes = expect_context::<Notifications>();
	let state = graph.state();
	let has_selection = move || state.with(GraphState::has_selection);

	let count = {
		let hobby = hobby.clone();
		move || state.with(|s| hobby_count(&s.users, &hobby))
	};
	let on_dragstart = {
		let hobby = hobby.clone();
		move |ev: DragEvent| {
			if !has_selection() {
				ev.prevent_default();
				notes.warning(SELECT_FIRST);
				return;
			}
			if let Some(dt) = ev.data_transfer() {
				let _ = dt.set_data("text/plain", &hobby);
			}
			graph.set_dragging_hobby(Some(hobby.clone()));
		}
	};

	view! {
		<div
			class="hobby-token fade-in"
			class:disabled=move || !has_selection()
			draggable=move || if has_selection() { "true" } else { "false" }
			on:dragstart=on_dragstart
			on:dragend=move |_| graph.set_dragging_hobby(None)
		>
			<p class="hobby-name">{hobby}</p>
			<p class="hobby-count">{move || format!("{} users", count())}</p>
		</div>
	}
}

#[component]
fn SelectedUserPanel() -> impl IntoView {
	let graph = expect_context::<GraphStore>();
	let actions = expect_context::<AppActions>();
	let state = graph.state();

	let friends = move || {
		state.with(|s| {
			let Some(user) = s.selected_user() else {
				return Vec::new();
			};
			user.friends
				.iter()
				.map(|fid| {
					let name = s
						.user(fid)
						.map(|f| f.username.clone())
						.unwrap_or_else(|| fid.clone());
					(user.id.clone(), fid.clone(), name)
				})
				.collect::<Vec<_>>()
		})
	};

	view! {
		<Show when=move || state.with(GraphState::has_selection)>
			<div class="selected-user fade-in">
				<p class="strong">
					"Selected User: "
					{move || state.with(|s| s.selected_user().map(|u| u.username.clone()))}
				</p>
				<ul class="friend-list">
					<For
						each=friends
						key=|(uid, fid, _)| format!("{uid}-{fid}")
						children={
							let actions = actions.clone();
							move |(uid, fid, name)| {
								let actions = actions.clone();
								let unlink = move |_| {
									let (actions, uid, fid) = (actions.clone(), uid.clone(), fid.clone());
									spawn_local(async move {
										actions.unlink_users(&uid, &fid).await;
									});
								};
								view! {
									<li>
										<span>{name}</span>
										<button class="link-btn" title="Unlink" on:click=unlink>
											"Unlink"
										</button>
									</li>
								}
							}
						}
					/>
				</ul>
			</div>
		</Show>
	}
}

#[component]
fn AddHobby() -> impl IntoView {
	let graph = expect_context::<GraphStore>();
	let notes = expect_context::<Notifications>();
	let actions = expect_context::<AppActions>();
	let state = graph.state();
	let (open, new_hobby, busy) = (RwSignal::new(false), RwSignal::new(String::new()), RwSignal::new(false));

	let submit = move || {
		if busy.get_untracked() {
			return;
		}
		let Some(user_id) = state.with_untracked(|s| s.selected_user().map(|u| u.id.clone())) else {
			notes.warning(SELECT_FIRST);
			return;
		};
		busy.set(true);
		let (actions, hobby) = (actions.clone(), new_hobby.get_untracked());
		spawn_local(async move {
			if actions.add_hobby(&user_id, &hobby).await {
				new_hobby.set(String::new());
				open.set(false);
			}
			busy.set(false);
		});
	};
	let submit_key = submit.clone();
	let cancel = move |_| {
		if !busy.get_untracked() {
			open.set(false);
			new_hobby.set(String::new());
		}
	};
	let open_input = move |_| {
		if !state.with_untracked(GraphState::has_selection) {
			notes.warning(SELECT_FIRST);
			return;
		}
		open.set(true);
	};

	view! {
		<div class="sidebar-footer">
			<Show
				when=move || open.get()
				fallback=move || {
					view! {
						<button
							class="btn btn-primary wide"
							disabled=move || busy.get() || !state.with(GraphState::has_selection)
							on:click=open_input
						>
							"+ Add Hobby"
						</button>
					}
				}
			>
				<div class="add-hobby fade-in">
					<input
						type="text"
						placeholder="New hobby..."
						prop:value=move || new_hobby.get()
						disabled=move || busy.get()
						on:input=move |ev| new_hobby.set(event_target_value(&ev))
						on:keydown={
							let submit_key = submit_key.clone();
							move |ev: KeyboardEvent| {
								if ev.key() == "Enter" {
									submit_key();
								}
							}
						}
					/>
					<button class="btn btn-success" disabled=move || busy.get() on:click={
						let submit = submit.clone();
						move |_| submit()
					}>
						{move || if busy.get() { "\u{23F3}" } else { "\u{2713}" }}
					</button>
					<button class="btn btn-muted" disabled=move || busy.get() on:click=cancel>
						"\u{2715}"
					</button>
				</div>
			</Show>
		</div>
	}
}

/// Hobby palette, search box and the selected user's details.
#[component]
pub fn Sidebar() -> impl IntoView {
	let graph = expect_context::<GraphStore>();
	let state = graph.state();
	let search = RwSignal::new(String::new());

	let hobbies = Memo::new(move |_| state.with(|s| all_hobbies(&s.users)));
	let filtered = move || search.with(|term| filter_hobbies(&hobbies.get(), term));

	view! {
		<aside class="sidebar slide-in-left">
			<div class="sidebar-header">
				<h2>"Hobbies & Activities"</h2>
				<p>
					{move || {
						if state.with(GraphState::has_selection) {
							"Drag hobbies onto users to add them"
						} else {
							"Select a user first"
						}
					}}
				</p>
			</div>

			<div class="sidebar-search">
				<input
					type="text"
					placeholder="Search hobbies..."
					prop:value=move || search.get()
					on:input=move |ev| search.set(event_target_value(&ev))
				/>
			</div>

			<SelectedUserPanel />

			<div class="hobby-list">
				<Show
					when=move || !filtered().is_empty()
					fallback=move || {
						view! {
							<p class="empty">
								{move || {
									if search.with(|t| t.is_empty()) {
										"No hobbies yet"
									} else {
										"No hobbies found"
									}
								}}
							</p>
						}
					}
				>
					<For
						each=filtered
						key=|h| h.clone()
						children=move |hobby| view! { <HobbyToken hobby=hobby /> }
					/>
				</Show>
			</div>

			<AddHobby />
		</aside>
	}
}
