//! UI Components for the smoking dashboard.
//!
//! # Layout Components
//! - [`Hero`] - Heading, description and data source
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`RegionPicker`] - Multiselect of autonomous communities
//! - [`ChartPanel`] - Vega-Lite line chart with legend selection
//! - [`DataTable`] - Wide table of regions × periods
//! - [`LogsPanel`] - Real-time pipeline logs (SSE)

mod chart_panel;
mod data_table;
mod footer;
mod hero;
mod logs;
mod region_picker;

pub use chart_panel::*;
pub use data_table::*;
pub use footer::*;
pub use hero::*;
pub use logs::*;
pub use region_picker::*;
