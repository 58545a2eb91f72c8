//! chart-dash: an interactive dashboard over uploaded CSV data.
//!
//! A [`DashboardSession`] owns the parsed dataset and the user's selections.
//! Each evaluation dispatches the selected chart type through a static table,
//! builds a backend-agnostic [`api::Figure`], and turns it into a layered
//! [`render::RenderFrame`] for SVG, Cairo or headless backends.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{ChartKind, ChartRequest, DashboardConfig, DashboardSession, DashboardView};
pub use error::{ChartError, ChartResult};
