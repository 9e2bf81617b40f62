//! The two shared stores: graph data and toast notifications.
//!
//! Both are `Copy` handles over signals and are handed down through Leptos
//! context rather than living in globals.

mod graph;
mod notifications;

pub use graph::{GraphAction, GraphState, GraphStore, SyncToken};
pub use notifications::{
	BrowserTimer, DEFAULT_TTL, Notification, Notifications, Severity, Timer,
};

#[cfg(test)]
pub(crate) use notifications::tests::ManualTimer;
