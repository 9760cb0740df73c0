//! Application configuration.
//!
//! Hardcoded for development; the backend serves the built bundle itself
//! in production, so relative URLs work there too.

/// Backend API base URL.
pub const BACKEND_URL: &str = "http://localhost:3000";

/// Browser tab title.
pub const PAGE_TITLE: &str = "Smoking in Spain";

/// DOM id of the element vega-embed draws into.
pub const CHART_ELEMENT_ID: &str = "smoking-chart";

/// Name of the Vega-Lite selection parameter (must match the backend spec).
pub const SELECTION_PARAM: &str = "region_select";

/// Maximum logs to keep in memory.
pub const MAX_LOG_ENTRIES: usize = 100;
