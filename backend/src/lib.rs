//! # Smokestats - smoking in Spain by autonomous community
//!
//! Downloads the INE smoking table, reshapes it and serves a wide data table
//! plus a filterable line chart to the dashboard frontend.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  INE CSV    │────▶│   Parser    │────▶│  Normalize  │────▶│    Pivot    │──▶ WideTable
//! │ (cached)    │     │ (;, ragged) │     │ (es-ES nums)│     │ (by region) │
//! └─────────────┘     └─────────────┘     └──────┬──────┘     └─────────────┘
//!                                                └──────────▶ ChartSpec (Vega-Lite)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use smokestats::{load_dashboard, FetchCache, HttpFetcher, PipelineOptions, RegionSelection};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cache = FetchCache::new();
//!     let fetcher = HttpFetcher::new(Default::default())?;
//!     let dashboard = load_dashboard(&cache, &fetcher, &PipelineOptions::default()).await?;
//!     let chart = dashboard.chart(&RegionSelection::from_query("Total Nacional"));
//!     println!("{}", serde_json::to_string_pretty(&chart)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`config`] - Dataset constants and fetch policy
//! - [`models`] - RawRow, NormalizedRow, WideTable, RegionSet
//! - [`fetch`] - HTTP and file fetchers
//! - [`cache`] - Memoized downloads
//! - [`parser`] - Decoding and CSV parsing
//! - [`transform`] - Normalization, pivot and pipeline
//! - [`chart`] - Vega-Lite spec and region selection
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Input
pub mod cache;
pub mod fetch;
pub mod parser;

// Transformation
pub mod transform;

// Charting
pub mod chart;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Errors and config
// =============================================================================

pub use error::{CsvError, FetchError, PipelineError, PivotError, ServerError};

pub use config::{ColumnNames, DatasetSource, FetchConfig};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{NormalizedRow, RawRow, RegionSet, WideRow, WideTable};

// =============================================================================
// Re-exports - Input
// =============================================================================

pub use cache::{CachedText, FetchCache};
pub use fetch::{DatasetFetcher, FileFetcher, Fetcher, HttpFetcher};
pub use parser::{decode_content, detect_encoding, parse_table, RawTable, TextEncoding};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::{
    build_dashboard, build_dashboard_from_bytes, load_dashboard, normalize,
    parse_localized_number, pivot, split_region, strip_provisional, Dashboard, PipelineOptions,
    PipelineStats, PivotOutcome,
};

// =============================================================================
// Re-exports - Chart
// =============================================================================

pub use chart::{ChartBuilder, ChartSpec, RegionSelection, SelectionEvent, SharedSelection};

// Server
pub mod server {
    pub use crate::api::server::{start_server, ServerConfig};
}
