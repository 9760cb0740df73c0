//! Backend and chart services.
//!
//! # Services
//!
//! - [`dashboard`] - Dashboard payload from the backend
//! - [`chart`] - vega-embed rendering
//!
//! # JavaScript Bindings
//!
//! `chart` uses `src/js/chart.js`, which wraps the vega-embed global loaded
//! by `index.html`.

pub mod chart;
pub mod dashboard;

pub use chart::*;
pub use dashboard::*;
