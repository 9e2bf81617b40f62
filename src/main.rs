use relationship_graph::{App, AppConfig, init_logging};

fn main() {
	init_logging(&AppConfig::from_env());
	leptos::mount::mount_to_body(App);
}
