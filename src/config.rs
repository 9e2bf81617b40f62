//! Build-time configuration.
//!
//! Values are baked in through environment variables at compile time (Trunk
//! forwards the shell environment to `cargo build`), so a deployed bundle
//! never has to discover its backend at runtime.

use log::Level;

/// Backend used when `USER_GRAPH_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Application settings shared through Leptos context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
	/// Base URL of the relationship service, without a trailing slash.
	pub api_base_url: String,
	/// Minimum level forwarded to the browser console.
	pub log_level: Level,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base_url: DEFAULT_API_URL.into(),
			log_level: Level::Debug,
		}
	}
}

impl AppConfig {
	/// Reads `USER_GRAPH_API_URL` and `USER_GRAPH_LOG_LEVEL` as captured at build time.
	pub fn from_env() -> Self {
		Self::from_values(
			option_env!("USER_GRAPH_API_URL"),
			option_env!("USER_GRAPH_LOG_LEVEL"),
		)
	}

	fn from_values(api_url: Option<&str>, log_level: Option<&str>) -> Self {
		let defaults = Self::default();
		let api_base_url = api_url
			.map(str::trim)
			.filter(|url| !url.is_empty())
			.map(|url| url.trim_end_matches('/').to_string())
			.unwrap_or(defaults.api_base_url);
		let log_level = log_level
			.and_then(|level| level.trim().parse::<Level>().ok())
			.unwrap_or(defaults.log_level);

		Self {
			api_base_url,
			log_level,
		}
	}
}
