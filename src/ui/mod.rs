//! Presentation layer: a terminal rendering of the dashboard.
//!
//! Holds no logic of its own beyond scroll position. Every frame is derived
//! from the poller and stream state via [`render::DashboardView`].

pub mod app;
pub mod format;
pub mod render;

pub use app::App;
pub use render::{DashboardView, EMPTY_TABLE_TEXT, render};
