//! Line chart specification (Vega-Lite v5).
//!
//! The chart is a declarative spec handed to the browser: period on x,
//! value on y, one colored series per region. Region filtering happens
//! client-side through a point selection bound to the legend, so toggling
//! series never re-runs the pipeline.
//!
//! ```rust,ignore
//! let spec = ChartBuilder::new(&rows, &regions)
//!     .default_regions(["Andalucía", "Total Nacional"])
//!     .build();
//! let json = serde_json::to_string(&spec)?;
//! ```

pub mod selection;

use serde::{Deserialize, Serialize};

use crate::config::{ColumnNames, CHART_HEIGHT};
use crate::models::{NormalizedRow, RegionSet};

pub use selection::{RegionSelection, SelectionEvent, SharedSelection};

/// Vega-Lite schema URL.
pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Name of the region selection parameter.
pub const SELECTION_PARAM: &str = "region_select";

/// Complete chart specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub data: InlineData,
    pub mark: Mark,
    pub encoding: Encoding,
    pub params: Vec<SelectionParam>,
    pub transform: Vec<FilterTransform>,
    pub height: u32,
    /// `"container"`: the width follows the embedding element.
    pub width: String,
    pub autosize: AutoSize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineData {
    pub values: Vec<NormalizedRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: String,
    pub point: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encoding {
    pub x: PositionChannel,
    pub y: PositionChannel,
    pub color: ColorChannel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionChannel {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorChannel {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub scale: Scale,
}

/// Fixed categorical domain so colors stay stable under filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub domain: RegionSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionParam {
    pub name: String,
    pub select: PointSelect,
    pub bind: String,
    /// Initial selection; omitted when empty (everything drawn).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value: Vec<SelectedRegion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSelect {
    #[serde(rename = "type")]
    pub kind: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedRegion {
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterTransform {
    pub filter: ParamPredicate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamPredicate {
    pub param: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoSize {
    #[serde(rename = "type")]
    pub kind: String,
    pub contains: String,
}

impl ChartSpec {
    /// Regions the selection starts with.
    pub fn default_regions(&self) -> Vec<&str> {
        self.params
            .iter()
            .flat_map(|p| p.value.iter().map(|v| v.region.as_str()))
            .collect()
    }
}

/// Builder for [`ChartSpec`].
pub struct ChartBuilder<'a> {
    rows: &'a [NormalizedRow],
    domain: &'a RegionSet,
    defaults: RegionSelection,
    columns: ColumnNames,
    height: u32,
}

impl<'a> ChartBuilder<'a> {
    pub fn new(rows: &'a [NormalizedRow], domain: &'a RegionSet) -> Self {
        Self {
            rows,
            domain,
            defaults: RegionSelection::default(),
            columns: ColumnNames::default(),
            height: CHART_HEIGHT,
        }
    }

    /// Initial legend selection. Names are not checked against the domain;
    /// unknown ones simply match no series.
    pub fn default_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defaults = regions.into_iter().collect();
        self
    }

    pub fn selection(mut self, selection: RegionSelection) -> Self {
        self.defaults = selection;
        self
    }

    /// Axis and legend titles come from the dataset headers.
    pub fn titles(mut self, columns: &ColumnNames) -> Self {
        self.columns = columns.clone();
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn build(self) -> ChartSpec {
        ChartSpec {
            schema: VEGA_LITE_SCHEMA.to_string(),
            data: InlineData {
                values: self.rows.to_vec(),
            },
            mark: Mark {
                kind: "line".to_string(),
                point: true,
            },
            encoding: Encoding {
                x: PositionChannel {
                    field: "period".to_string(),
                    kind: "ordinal".to_string(),
                    title: self.columns.period.clone(),
                    sort: Some("ascending".to_string()),
                },
                y: PositionChannel {
                    field: "value".to_string(),
                    kind: "quantitative".to_string(),
                    title: self.columns.value.clone(),
                    sort: None,
                },
                color: ColorChannel {
                    field: "region".to_string(),
                    kind: "nominal".to_string(),
                    title: self.columns.region.clone(),
                    scale: Scale {
                        domain: self.domain.clone(),
                    },
                },
            },
            params: vec![SelectionParam {
                name: SELECTION_PARAM.to_string(),
                select: PointSelect {
                    kind: "point".to_string(),
                    fields: vec!["region".to_string()],
                },
                bind: "legend".to_string(),
                value: self
                    .defaults
                    .iter()
                    .map(|r| SelectedRegion { region: r.clone() })
                    .collect(),
            }],
            transform: vec![FilterTransform {
                filter: ParamPredicate {
                    param: SELECTION_PARAM.to_string(),
                },
            }],
            height: self.height,
            width: "container".to_string(),
            autosize: AutoSize {
                kind: "fit".to_string(),
                contains: "padding".to_string(),
            },
        }
    }
}
