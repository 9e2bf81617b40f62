use leptos::prelude::*;

use crate::state::{Notification, Notifications};

#[component]
fn Toast(notification: Notification, notes: Notifications) -> impl IntoView {
	let Notification {
		id,
		message,
		severity,
		..
	} = notification;

	view! {
		<div class=format!("toast toast-{} slide-in", severity) role="status">
			<span class="toast-icon">{severity.icon()}</span>
			<span class="toast-message">{message}</span>
			<button class="toast-close" title="Dismiss" on:click=move |_| notes.dismiss(&id)>
				"\u{2715}"
			</button>
		</div>
	}
}

/// Stack of live toasts, top-right.
#[component]
pub fn NotificationContainer() -> impl IntoView {
	let notes = expect_context::<Notifications>();
	let list = notes.list();

	view! {
		<div class="toast-stack">
			<For
				each=move || list.get()
				key=|n| n.id.clone()
				children=move |n| view! { <Toast notification=n notes=notes /> }
			/>
		</div>
	}
}
