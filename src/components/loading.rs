use leptos::prelude::*;

#[component]
pub fn LoadingSpinner(#[prop(into, default = "Loading...".into())] text: String) -> impl IntoView {
	view! {
		<div class="loading fade-in">
			<div class="spinner"></div>
			<p>{text}</p>
		</div>
	}
}

pub fn reload_page() {
	if let Some(window) = web_sys::window() {
		let _ = window.location().reload();
	}
}

/// Fallback for the error boundaries: a message, the collected errors and a
/// way out.
#[component]
pub fn ErrorFallback(errors: ArcRwSignal<Errors>) -> impl IntoView {
	view! {
		<div class="error-fallback fade-in">
			<div class="error-icon">"\u{26A0}"</div>
			<h2>"Something went wrong"</h2>
			<ul>
				{move || {
					errors
						.get()
						.into_iter()
						.map(|(_, e)| view! { <li>{e.to_string()}</li> })
						.collect_view()
				}}
			</ul>
			<button class="btn btn-primary" on:click=|_| reload_page()>
				"Reload"
			</button>
		</div>
	}
}
