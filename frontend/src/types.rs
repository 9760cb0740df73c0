//! Common types used across the frontend application.
//!
//! Mirrors of the backend payloads (`backend/src/api/types.rs`) plus the
//! client-side selection state.
//!
//! # Categories
//!
//! - **API Types** - Dashboard payload
//! - **Selection Types** - Shared legend / multiselect state
//! - **Log Types** - Real-time log streaming
//! - **Error Types** - Frontend error handling

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use crate::config::SELECTION_PARAM;

// =============================================================================
// API Response Types
// =============================================================================

/// Response of `GET /api/dashboard`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub render_id: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub page: PageText,
    pub source: SourceInfo,
    pub regions: Vec<String>,
    pub selected: Vec<String>,
    pub table: WideTable,
    /// Vega-Lite spec, handed to vega-embed untouched apart from the selection
    pub chart: Value,
    pub stats: PipelineStats,
}

/// Static page copy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageText {
    pub heading: String,
    pub description: String,
    pub chart_heading: String,
    pub chart_hint: String,
    pub table_heading: String,
}

/// Dataset links.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub csv_url: String,
    pub web_url: String,
}

impl SourceInfo {
    /// Attribution link text: the browsable table URL itself.
    pub fn attribution(&self) -> &str {
        &self.web_url
    }
}

/// Regions × periods table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WideTable {
    #[serde(rename = "index")]
    pub index_name: String,
    #[serde(rename = "columns")]
    pub periods: Vec<String>,
    pub rows: Vec<WideRow>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WideRow {
    pub region: String,
    pub values: Vec<Option<f64>>,
}

/// Pipeline bookkeeping shown under the table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStats {
    pub encoding: String,
    pub headers: Vec<String>,
    pub row_count: usize,
    pub missing_values: usize,
    pub duplicate_cells: usize,
}

/// Format a table cell; missing values render empty.
pub fn format_cell(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{:.0}", v),
        Some(v) => format!("{}", v),
        None => String::new(),
    }
}

// =============================================================================
// Selection Types
// =============================================================================

/// Which control produced the current selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionOrigin {
    /// Initial value from the dashboard payload
    Initial,
    /// Chart legend click (vega already shows it)
    Legend,
    /// Multiselect box (chart must be re-embedded)
    Control,
}

/// Active regions, written by both the legend and the multiselect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub regions: Vec<String>,
    pub origin: SelectionOrigin,
}

impl Selection {
    pub fn initial(regions: Vec<String>) -> Self {
        Self::with_origin(regions, SelectionOrigin::Initial)
    }

    pub fn from_legend(regions: Vec<String>) -> Self {
        Self::with_origin(regions, SelectionOrigin::Legend)
    }

    pub fn from_control(regions: Vec<String>) -> Self {
        Self::with_origin(regions, SelectionOrigin::Control)
    }

    /// Duplicates are dropped, first occurrence wins.
    fn with_origin(regions: Vec<String>, origin: SelectionOrigin) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(regions.len());
        for region in regions {
            if !unique.contains(&region) {
                unique.push(region);
            }
        }
        Self {
            regions: unique,
            origin,
        }
    }

    pub fn contains(&self, region: &str) -> bool {
        self.regions.iter().any(|r| r == region)
    }

    /// Same regions regardless of order or origin.
    pub fn same_regions(&self, other: &[String]) -> bool {
        self.regions.len() == other.len() && other.iter().all(|r| self.contains(r))
    }

    /// Does the chart need a re-embed to show this selection?
    pub fn needs_redraw(&self) -> bool {
        self.origin != SelectionOrigin::Legend
    }

    /// Write the selection into the spec's initial param value.
    ///
    /// An empty selection removes `value` so every series is drawn.
    pub fn apply_to_spec(&self, spec: &Value) -> Value {
        let mut spec = spec.clone();
        let Some(params) = spec.get_mut("params").and_then(Value::as_array_mut) else {
            return spec;
        };

        for param in params.iter_mut() {
            if param.get("name").and_then(Value::as_str) != Some(SELECTION_PARAM) {
                continue;
            }
            let Some(object) = param.as_object_mut() else {
                continue;
            };
            if self.regions.is_empty() {
                object.remove("value");
            } else {
                let value: Vec<Value> = self.regions.iter().map(|r| json!({ "region": r })).collect();
                object.insert("value".to_string(), Value::Array(value));
            }
        }
        spec
    }
}

// =============================================================================
// Log Types
// =============================================================================

/// Log severity level, as sent by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            LogLevel::Info => "log-info",
            LogLevel::Success => "log-success",
            LogLevel::Warning => "log-warning",
            LogLevel::Error => "log-error",
        }
    }
}

/// A single log entry received via SSE from `/api/logs`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    #[serde(default)]
    pub indent: u8,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl LogEntry {
    /// Local wall-clock time (HH:MM:SS)
    pub fn time_label(&self) -> String {
        self.timestamp
            .with_timezone(&chrono::Local)
            .format("%H:%M:%S")
            .to_string()
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Frontend application errors.
#[derive(Clone, Debug, PartialEq)]
pub enum AppError {
    /// Request could not be sent or the body not read.
    Network(String),
    /// Backend answered with an error status.
    Server { status: u16, message: String },
    /// Payload did not match the expected shape.
    Decode(String),
    /// Chart could not be drawn.
    Chart(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Server { status, message } => write!(f, "Server error ({}): {}", status, message),
            AppError::Decode(msg) => write!(f, "Invalid response: {}", msg),
            AppError::Chart(msg) => write!(f, "Chart error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;
