//! REST API types for the frontend.
//!
//! The frontend mirrors these structures in `frontend/src/types.rs`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::chart::{ChartSpec, RegionSelection};
use crate::config::DatasetSource;
use crate::models::{RegionSet, WideTable};
use crate::transform::pipeline::{Dashboard, PipelineStats};

/// Page heading.
pub const PAGE_HEADING: &str = "Smoking stats";

/// Short description under the heading.
pub const PAGE_DESCRIPTION: &str = "Data of smoking in Spain by community";

/// Usage hint above the chart.
pub const CHART_HINT: &str = "Use the legend to filter by clicking on one or multiselecting with shift + click or the selection box";

/// Everything needed to render the page once.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Identifies this render in logs
    pub render_id: String,
    pub generated_at: DateTime<Utc>,
    pub page: PageText,
    pub source: SourceInfo,
    pub regions: RegionSet,
    pub selected: RegionSelection,
    pub table: WideTable,
    pub chart: ChartSpec,
    pub stats: PipelineStats,
}

/// Static page copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageText {
    pub heading: String,
    pub description: String,
    pub chart_heading: String,
    pub chart_hint: String,
    pub table_heading: String,
}

impl Default for PageText {
    fn default() -> Self {
        Self {
            heading: PAGE_HEADING.to_string(),
            description: PAGE_DESCRIPTION.to_string(),
            chart_heading: "Smoking by community".to_string(),
            chart_hint: CHART_HINT.to_string(),
            table_heading: "Data table".to_string(),
        }
    }
}

/// Where the data comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    /// CSV download URL
    pub csv_url: String,
    /// Browsable table, shown as attribution
    pub web_url: String,
}

impl From<&DatasetSource> for SourceInfo {
    fn from(source: &DatasetSource) -> Self {
        Self {
            csv_url: source.csv_url(),
            web_url: source.web_url(),
        }
    }
}

impl DashboardResponse {
    pub fn new(dashboard: &Dashboard, source: &DatasetSource, selected: RegionSelection) -> Self {
        Self {
            render_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            page: PageText::default(),
            source: SourceInfo::from(source),
            regions: dashboard.regions.clone(),
            chart: dashboard.chart(&selected),
            selected,
            table: dashboard.table.clone(),
            stats: dashboard.stats.clone(),
        }
    }
}

/// Query string of the chart and dashboard endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionsQuery {
    /// Comma-separated default selection
    #[serde(default)]
    pub regions: Option<String>,
}

impl RegionsQuery {
    pub fn selection(&self) -> RegionSelection {
        self.regions
            .as_deref()
            .map(RegionSelection::from_query)
            .unwrap_or_default()
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "renderId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TextEncoding;
    use crate::transform::pipeline::{build_dashboard, PipelineOptions};

    const SAMPLE: &str = "Comunidades y Ciudades Autónomas;Total Nacional;periodo;Total\n\
                          01 Andalucía;;2022 (P);1.234,5\n\
                          ;Total Nacional;2022 (P);45.000,0\n";

    #[test]
    fn test_dashboard_response_camel_case() {
        let dashboard = build_dashboard(SAMPLE, TextEncoding::Utf8, &PipelineOptions::default()).unwrap();
        let response = DashboardResponse::new(
            &dashboard,
            &DatasetSource::smoking(),
            RegionSelection::from_query("Andalucía"),
        );
        let json = serde_json::to_value(&response).unwrap();

        assert!(json["renderId"].is_string());
        assert_eq!(json["page"]["heading"], PAGE_HEADING);
        assert_eq!(json["source"]["webUrl"], DatasetSource::smoking().web_url());
        assert_eq!(json["regions"][1], "Total Nacional");
        assert_eq!(json["selected"][0], "Andalucía");
        assert_eq!(json["table"]["columns"][0], "2022");
        assert_eq!(json["chart"]["params"][0]["value"][0]["region"], "Andalucía");
        assert_eq!(json["stats"]["rowCount"], 2);
    }

    #[test]
    fn test_regions_query() {
        let query = RegionsQuery {
            regions: Some("Murcia,Aragón".into()),
        };
        assert_eq!(query.selection().len(), 2);
        assert!(RegionsQuery::default().selection().is_empty());
    }

    #[test]
    fn test_error_response_shape() {
        let body = error_response("boom");
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "boom");
    }
}
