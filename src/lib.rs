//! Leptos client-side app for browsing and editing a user relationship graph.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::info;

// Modules
mod actions;
mod api;
mod components;
mod config;
mod form;
mod graph;
mod layout;
mod pages;
mod state;

pub use config::AppConfig;

use crate::actions::AppActions;
use crate::api::ApiClient;
use crate::components::loading::ErrorFallback;
use crate::state::{GraphStore, Notifications};

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging(config: &AppConfig) {
	let _ = console_log::init_with_level(config.log_level);
	console_error_panic_hook::set_once();
	info!("Logging initialized at {}", config.log_level);
}

/// Root component: shared stores in context, an error boundary and the router.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let config = AppConfig::from_env();
	let client = ApiClient::new(config.api_base_url.clone());
	info!("using relationship service at {}", client.base_url());
	let graph = GraphStore::new();
	let notes = Notifications::new();
	let actions = AppActions::new(client, graph, notes);
	provide_context(config);
	provide_context(graph);
	provide_context(notes);
	provide_context(actions);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="User Relationship Graph" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		// Last resort only; a failed load is caught by the graph area's own boundary.
		<ErrorBoundary fallback=|errors| view! { <ErrorFallback errors=errors /> }>
			<Router>
				<Routes fallback=|| view! { <NotFound /> }>
					<Route path=path!("/") view=Home />
				</Routes>
			</Router>
		</ErrorBoundary>
	}
}
