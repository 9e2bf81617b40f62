use leptos::prelude::*;
use leptos_router::components::A;

/// 404 page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found fade-in">
			<h1>"Page not found"</h1>
			<p class="subtitle">"There is nothing at this address."</p>
			<A href="/">"Back to the graph"</A>
		</div>
	}
}
