//! UI components.

pub mod graph_canvas;
pub mod graph_view;
pub mod loading;
pub mod notifications;
pub mod sidebar;
pub mod top_bar;
pub mod user_management;
