use leptos::ev::KeyboardEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::actions::AppActions;
use crate::api::User;
use crate::form::{MAX_AGE, MIN_AGE, UserForm};
use crate::state::{GraphStore, Notifications};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
	Form,
	List,
}

/// Modal for creating, editing and deleting users.
#[component]
pub fn UserManagementPanel(
	#[prop(into)] visible: Signal<bool>,
	on_close: Callback<()>,
) -> impl IntoView {
	let graph = expect_context::<GraphStore>();
	let notes = expect_context::<Notifications>();
	let actions = expect_context::<AppActions>();
	let state = graph.state();

	let tab = RwSignal::new(Tab::Form);
	let form = RwSignal::new(UserForm::default());
	let editing = RwSignal::new(None::<String>);
	let hobby_input = RwSignal::new(String::new());
	let confirm_delete = RwSignal::new(None::<User>);

	let reset = move || {
		form.set(UserForm::default());
		editing.set(None);
		hobby_input.set(String::new());
	};

	let add_chip = move || {
		let hobby = hobby_input.get_untracked();
		let mut added = Ok(false);
		form.update(|f| added = f.add_hobby(&hobby));
		match added {
			Ok(true) => hobby_input.set(String::new()),
			Ok(false) => {}
			Err(err) => notes.warning(err.to_string()),
		}
	};

	let save = {
		let actions = actions.clone();
		Callback::new(move |()| {
			let (actions, draft, id) = (actions.clone(), form.get_untracked(), editing.get_untracked());
			spawn_local(async move {
				if actions.save_user(id.as_deref(), &draft).await {
					reset();
					on_close.run(());
				}
			});
		})
	};

	let start_edit = move |user: User| {
		form.set(UserForm::from_user(&user));
		editing.set(Some(user.id));
		hobby_input.set(String::new());
		tab.set(Tab::Form);
	};

	let confirm = Callback::new(move |()| {
		let Some(user) = confirm_delete.get_untracked() else {
			return;
		};
		confirm_delete.set(None);
		let actions = actions.clone();
		spawn_local(async move {
			if actions.delete_user(&user.id).await && editing.get_untracked() == Some(user.id) {
				reset();
			}
		});
	});

	let close = move |_| {
		reset();
		on_close.run(());
	};

	let users = move || state.with(|s| s.users.clone());
	let busy = move || state.with(|s| s.loading);

	view! {
		<Show when=move || visible.get()>
			<div class="modal-backdrop fade-in">
				<div class="modal">
					<div class="modal-header">
						<h2>"User Management"</h2>
						<button class="icon-btn" title="Close" on:click=close>"\u{2715}"</button>
					</div>

					<div class="tabs">
						<button class:active=move || tab.get() == Tab::Form on:click=move |_| tab.set(Tab::Form)>
							{move || if editing.with(Option::is_some) { "Edit User" } else { "New User" }}
						</button>
						<button class:active=move || tab.get() == Tab::List on:click=move |_| tab.set(Tab::List)>
							{move || format!("View All ({})", state.with(|s| s.users.len()))}
						</button>
					</div>

					<Show
						when=move || tab.get() == Tab::Form
						fallback=move || {
							view! {
								<ul class="user-list">
									<For
										each=users
										key=|u| u.id.clone()
										children=move |user| {
											let (edit_user, delete_user) = (user.clone(), user.clone());
											view! {
												<li class="user-row">
													<div>
														<p class="strong">{user.username.clone()}</p>
														<p class="subtitle">
															{format!(
																"Age: {} \u{2022} Score: {:.1}",
																user.age,
																user.popularity_score,
															)}
														</p>
														<p class="chips">
															{user
																.hobbies
																.iter()
																.map(|h| view! { <span class="chip">{h.clone()}</span> })
																.collect_view()}
														</p>
														<p class="subtitle">
															{format!("{} friends", user.friends.len())}
														</p>
													</div>
													<div class="row-actions">
														<button
															class="btn btn-muted"
															on:click=move |_| start_edit(edit_user.clone())
														>
															"Edit"
														</button>
														<button
															class="btn btn-danger"
															on:click=move |_| confirm_delete.set(Some(delete_user.clone()))
														>
															"Delete"
														</button>
													</div>
												</li>
											}
										}
									/>
								</ul>
							}
						}
					>
						<form
							class="user-form"
							on:submit=move |ev| {
								ev.prevent_default();
								save.run(());
							}
						>
							<label>
								"Username"
								<input
									type="text"
									placeholder="Enter username"
									prop:value=move || form.with(|f| f.username.clone())
									on:input=move |ev| form.update(|f| f.username = event_target_value(&ev))
								/>
							</label>
							<label>
								"Age"
								<input
									type="number"
									min=MIN_AGE.to_string()
									max=MAX_AGE.to_string()
									prop:value=move || form.with(|f| f.age.to_string())
									on:input=move |ev| form.update(|f| f.set_age_input(&event_target_value(&ev)))
								/>
							</label>
							<label>
								"Hobbies"
								<div class="hobby-input">
									<input
										type="text"
										placeholder="Add a hobby"
										prop:value=move || hobby_input.get()
										on:input=move |ev| hobby_input.set(event_target_value(&ev))
										on:keydown=move |ev: KeyboardEvent| {
											if ev.key() == "Enter" {
												ev.prevent_default();
												add_chip();
											}
										}
									/>
									<button type="button" class="btn btn-muted" on:click=move |_| add_chip()>
										"Add"
									</button>
								</div>
							</label>
							<div class="chips">
								<For
									each=move || form.with(|f| f.hobbies.clone())
									key=|h| h.clone()
									children=move |hobby| {
										let remove = hobby.clone();
										view! {
											<span class="chip">
												{hobby}
												<button
													type="button"
													class="chip-remove"
													on:click=move |_| form.update(|f| f.remove_hobby(&remove))
												>
													"\u{2715}"
												</button>
											</span>
										}
									}
								/>
							</div>
							<div class="form-actions">
								<button type="submit" class="btn btn-primary" disabled=busy>
									{move || if editing.with(Option::is_some) { "Update User" } else { "Create User" }}
								</button>
								<Show when=move || editing.with(Option::is_some)>
									<button type="button" class="btn btn-muted" on:click=move |_| reset()>
										"Cancel"
									</button>
								</Show>
							</div>
						</form>
					</Show>
				</div>

				<Show when=move || confirm_delete.with(Option::is_some)>
					<div class="modal confirm fade-in">
						<h3>"Delete user?"</h3>
						<p>
							{move || {
								confirm_delete
									.with(|u| {
										u.as_ref()
											.map(|u| format!("\"{}\" will be removed permanently.", u.username))
									})
							}}
						</p>
						<div class="form-actions">
							<button class="btn btn-muted" on:click=move |_| confirm_delete.set(None)>
								"Cancel"
							</button>
							<button class="btn btn-danger" disabled=busy on:click=move |_| confirm.run(())>
								"Delete"
							</button>
						</div>
					</div>
				</Show>
			</div>
		</Show>
	}
}
