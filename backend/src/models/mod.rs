//! Domain models for the smoking dataset.
//!
//! - [`RawRow`] - one CSV record, strings only
//! - [`NormalizedRow`] - cleaned long-format `(region, period, value)` triple
//! - [`WideTable`] - one row per region, one column per period
//! - [`RegionSet`] - ordered distinct regions (legend domain and option list)

use serde::{Deserialize, Serialize};

use crate::error::CsvError;

// =============================================================================
// Long format
// =============================================================================

/// One CSV record projected to the four dataset columns.
///
/// `None` means the cell was empty or the column does not exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRow {
    /// Compound "code name" label, e.g. `01 Andalucía`.
    pub region_name: Option<String>,
    /// National aggregate label, only filled on the national row.
    pub total_national: Option<String>,
    /// Period label, possibly with a ` (P)` marker.
    pub period: Option<String>,
    /// Localized number, e.g. `1.234,5`.
    pub value: Option<String>,
}

impl RawRow {
    pub fn new(
        region_name: Option<&str>,
        total_national: Option<&str>,
        period: Option<&str>,
        value: Option<&str>,
    ) -> Self {
        Self {
            region_name: region_name.map(String::from),
            total_national: total_national.map(String::from),
            period: period.map(String::from),
            value: value.map(String::from),
        }
    }
}

/// A cleaned long-format row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    /// Never empty.
    pub region: String,
    pub period: String,
    pub value: Option<f64>,
}

impl NormalizedRow {
    pub fn new(region: impl Into<String>, period: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            region: region.into(),
            period: period.into(),
            value,
        }
    }
}

// =============================================================================
// Wide format
// =============================================================================

/// One region of the wide table; `values` is aligned with [`WideTable::periods`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WideRow {
    pub region: String,
    pub values: Vec<Option<f64>>,
}

/// Pivoted table indexed by region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WideTable {
    /// Name of the index column (the region header).
    #[serde(rename = "index")]
    pub index_name: String,
    /// Period labels, sorted ascending.
    #[serde(rename = "columns")]
    pub periods: Vec<String>,
    /// Rows in order of first appearance of each region.
    pub rows: Vec<WideRow>,
}

impl WideTable {
    /// Number of regions.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of period columns (the index column is not counted).
    pub fn width(&self) -> usize {
        self.periods.len()
    }

    /// Cell lookup; `None` when the region, the period or the value is missing.
    pub fn get(&self, region: &str, period: &str) -> Option<f64> {
        let col = self.periods.iter().position(|p| p == period)?;
        self.rows
            .iter()
            .find(|r| r.region == region)
            .and_then(|r| r.values.get(col).copied().flatten())
    }

    /// The row labels as a [`RegionSet`].
    pub fn regions(&self) -> RegionSet {
        RegionSet(self.rows.iter().map(|r| r.region.clone()).collect())
    }

    /// Render as delimited text, missing cells left empty.
    pub fn to_csv(&self, delimiter: u8) -> Result<String, CsvError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(Vec::new());

        let header = std::iter::once(self.index_name.as_str())
            .chain(self.periods.iter().map(String::as_str));
        writer.write_record(header).map_err(to_csv_error)?;

        for row in &self.rows {
            let cells = std::iter::once(row.region.clone()).chain(
                row.values
                    .iter()
                    .map(|v| v.map(|n| n.to_string()).unwrap_or_default()),
            );
            writer.write_record(cells).map_err(to_csv_error)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| CsvError::EncodingError(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| CsvError::EncodingError(e.to_string()))
    }
}

fn to_csv_error(e: csv::Error) -> CsvError {
    let line = e.position().map(|p| p.line()).unwrap_or(0);
    CsvError::ParseError {
        line,
        message: e.to_string(),
    }
}

// =============================================================================
// Region set
// =============================================================================

/// Ordered distinct region labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionSet(Vec<String>);

impl RegionSet {
    pub fn new(regions: Vec<String>) -> Self {
        Self(regions)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, region: &str) -> bool {
        self.0.iter().any(|r| r == region)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a RegionSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> WideTable {
        WideTable {
            index_name: "Comunidades y Ciudades Autónomas".into(),
            periods: vec!["2020".into(), "2022".into()],
            rows: vec![
                WideRow {
                    region: "Andalucía".into(),
                    values: vec![Some(20.5), None],
                },
                WideRow {
                    region: "Total Nacional".into(),
                    values: vec![Some(19.8), Some(19.0)],
                },
            ],
        }
    }

    #[test]
    fn test_cell_lookup() {
        let table = sample_table();
        assert_eq!(table.get("Andalucía", "2020"), Some(20.5));
        assert_eq!(table.get("Andalucía", "2022"), None);
        assert_eq!(table.get("Murcia", "2020"), None);
        assert_eq!(table.get("Total Nacional", "1999"), None);
    }

    #[test]
    fn test_regions_follow_row_order() {
        let regions = sample_table().regions();
        assert_eq!(regions.as_slice(), ["Andalucía", "Total Nacional"]);
        assert!(regions.contains("Total Nacional"));
    }

    #[test]
    fn test_csv_rendering() {
        let csv = sample_table().to_csv(b';').unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Comunidades y Ciudades Autónomas;2020;2022");
        assert_eq!(lines[1], "Andalucía;20.5;");
        assert_eq!(lines[2], "Total Nacional;19.8;19");
    }

    #[test]
    fn test_wide_table_json_shape() {
        let json = serde_json::to_value(sample_table()).unwrap();
        assert_eq!(json["columns"][1], "2022");
        assert_eq!(json["rows"][0]["region"], "Andalucía");
        assert!(json["rows"][0]["values"][1].is_null());
    }

    #[test]
    fn test_region_set_serializes_as_array() {
        let set = RegionSet::new(vec!["A".into(), "B".into()]);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["A","B"]"#);
    }
}
