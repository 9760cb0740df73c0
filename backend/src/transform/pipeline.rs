//! High-level pipeline API: fetched text to dashboard artifacts.
//!
//! ```text
//! Fetcher ─▶ Parser ─▶ Transformer ─▶ Pivoter ─────▶ WideTable + RegionSet
//!                                  └─▶ Chart Builder ─▶ ChartSpec
//! ```
//!
//! Everything after the fetch is a pure function of the input text, so the
//! same bytes always give the same table and region set.
//!
//! # Example
//!
//! ```rust,ignore
//! use smokestats::{load_dashboard, FetchCache, HttpFetcher, PipelineOptions};
//!
//! let cache = FetchCache::new();
//! let fetcher = HttpFetcher::new(Default::default())?;
//! let dashboard = load_dashboard(&cache, &fetcher, &PipelineOptions::default()).await?;
//! println!("{} regions", dashboard.regions.len());
//! ```

use serde::Serialize;

use crate::api::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::cache::FetchCache;
use crate::chart::{ChartBuilder, ChartSpec, RegionSelection};
use crate::config::{ColumnNames, DatasetSource, DATASET_DELIMITER};
use crate::error::PipelineResult;
use crate::fetch::Fetcher;
use crate::models::{NormalizedRow, RegionSet, WideTable};
use crate::parser::{decode_content, parse_table, TextEncoding};

use super::normalize::{count_missing_values, normalize};
use super::pivot::pivot;

/// Options for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub source: DatasetSource,
    pub columns: ColumnNames,
    /// Declared encoding of the download
    pub encoding: TextEncoding,
    pub delimiter: u8,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            source: DatasetSource::smoking(),
            columns: ColumnNames::default(),
            encoding: TextEncoding::Auto,
            delimiter: DATASET_DELIMITER,
        }
    }
}

/// Bookkeeping about one run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStats {
    pub encoding: TextEncoding,
    pub headers: Vec<String>,
    pub row_count: usize,
    /// Rows whose value could not be parsed
    pub missing_values: usize,
    /// Wide-table cells written more than once
    pub duplicate_cells: usize,
}

/// Everything the page renders, computed once per run
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub rows: Vec<NormalizedRow>,
    pub table: WideTable,
    pub regions: RegionSet,
    pub columns: ColumnNames,
    pub stats: PipelineStats,
}

impl Dashboard {
    /// Chart with the legend selection initialised to `defaults`.
    pub fn chart(&self, defaults: &RegionSelection) -> ChartSpec {
        ChartBuilder::new(&self.rows, &self.regions)
            .titles(&self.columns)
            .selection(defaults.clone())
            .build()
    }
}

/// Fetch (through the cache) and transform the configured dataset.
pub async fn load_dashboard<F: Fetcher>(
    cache: &FetchCache,
    fetcher: &F,
    options: &PipelineOptions,
) -> PipelineResult<Dashboard> {
    let url = options.source.csv_url();
    let cached = cache.get_or_fetch(&url, fetcher, options.encoding).await?;
    build_dashboard(&cached.text, cached.encoding, options)
}

/// Decode and transform raw bytes.
pub fn build_dashboard_from_bytes(bytes: &[u8], options: &PipelineOptions) -> PipelineResult<Dashboard> {
    let (text, encoding) = decode_content(bytes, options.encoding)?;
    build_dashboard(&text, encoding, options)
}

/// Parse, normalize and pivot already-decoded text.
pub fn build_dashboard(
    text: &str,
    encoding: TextEncoding,
    options: &PipelineOptions,
) -> PipelineResult<Dashboard> {
    log_info("📖 Parsing CSV...");
    let table = parse_table(text, options.delimiter)?;
    log_success(format!(
        "Read {} rows, {} columns ({})",
        table.records.len(),
        table.headers.len(),
        encoding.label()
    ));
    log_info_indent(format!("Columns: {}", table.headers.join(", ")), 1);

    let raw = table.raw_rows(&options.columns);

    log_info("⚙️  Normalizing values...");
    let rows = normalize(&raw);
    let missing_values = count_missing_values(&rows);
    if missing_values > 0 {
        log_warning(format!("{} rows without a numeric value", missing_values));
    }

    log_info("🔄 Pivoting by region...");
    let outcome = pivot(&table.headers, &options.columns, &rows)?;
    if outcome.duplicates > 0 {
        log_warning(format!(
            "{} duplicate (region, period) cells, last value kept",
            outcome.duplicates
        ));
    }

    let wide = outcome.table;
    let regions = wide.regions();
    log_success(format!(
        "{} regions × {} periods",
        wide.height(),
        wide.width()
    ));

    Ok(Dashboard {
        stats: PipelineStats {
            encoding,
            headers: table.headers,
            row_count: rows.len(),
            missing_values,
            duplicate_cells: outcome.duplicates,
        },
        rows,
        table: wide,
        regions,
        columns: options.columns.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchResult, PipelineError};

    const SAMPLE: &str = "Comunidades y Ciudades Autónomas;Total Nacional;periodo;Total\n\
                          01 Andalucía;;2022 (P);1.234,5\n\
                          ;Total Nacional;2022 (P);45.000,0\n";

    struct StaticFetcher(&'static str);

    impl Fetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> FetchResult<Vec<u8>> {
            Ok(self.0.as_bytes().to_vec())
        }
    }

    #[test]
    fn test_columns_logged_indented() {
        use crate::api::logs::LOG_BROADCASTER;
        use tokio::sync::broadcast::error::TryRecvError;

        let mut rx = LOG_BROADCASTER.subscribe();
        build_dashboard(SAMPLE, TextEncoding::Utf8, &PipelineOptions::default()).unwrap();

        let mut found = false;
        loop {
            match rx.try_recv() {
                Ok(entry) if entry.indent == 1 && entry.message.starts_with("Columns: Comunidades") => {
                    found = true;
                    break;
                }
                Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        assert!(found);
    }

    #[test]
    fn test_end_to_end_sample() {
        let dashboard = build_dashboard(SAMPLE, TextEncoding::Utf8, &PipelineOptions::default()).unwrap();

        assert_eq!(
            dashboard.rows,
            vec![
                NormalizedRow::new("Andalucía", "2022", Some(1234.5)),
                NormalizedRow::new("Total Nacional", "2022", Some(45000.0)),
            ]
        );
        assert_eq!(dashboard.table.periods, vec!["2022"]);
        assert_eq!(dashboard.table.height(), 2);
        assert_eq!(dashboard.table.get("Andalucía", "2022"), Some(1234.5));
        assert_eq!(dashboard.table.get("Total Nacional", "2022"), Some(45000.0));
        assert_eq!(dashboard.regions.as_slice(), ["Andalucía", "Total Nacional"]);
        assert_eq!(dashboard.stats.row_count, 2);
        assert_eq!(dashboard.stats.missing_values, 0);
    }

    #[test]
    fn test_rerun_is_identical() {
        let options = PipelineOptions::default();
        let first = build_dashboard_from_bytes(SAMPLE.as_bytes(), &options).unwrap();
        let second = build_dashboard_from_bytes(SAMPLE.as_bytes(), &options).unwrap();

        assert_eq!(first.table, second.table);
        assert_eq!(first.regions, second.regions);
    }

    #[test]
    fn test_bad_values_do_not_block_the_table() {
        let text = "Comunidades y Ciudades Autónomas;Total Nacional;periodo;Total\n\
                    01 Andalucía;;2021;..\n\
                    01 Andalucía;;2022 (P);20,1\n\
                    02 Aragón;;2022 (P)\n";
        let dashboard = build_dashboard(text, TextEncoding::Utf8, &PipelineOptions::default()).unwrap();

        assert_eq!(dashboard.stats.missing_values, 2);
        assert_eq!(dashboard.table.get("Andalucía", "2021"), None);
        assert_eq!(dashboard.table.get("Andalucía", "2022"), Some(20.1));
        assert!(dashboard.regions.contains("Aragón"));
    }

    #[test]
    fn test_missing_period_column_fails() {
        let text = "Comunidades y Ciudades Autónomas;Total\n01 Andalucía;1,0\n";
        let result = build_dashboard(text, TextEncoding::Utf8, &PipelineOptions::default());
        assert!(matches!(result, Err(PipelineError::Pivot(_))));
    }

    #[test]
    fn test_empty_input_fails() {
        let result = build_dashboard_from_bytes(b"", &PipelineOptions::default());
        assert!(matches!(result, Err(PipelineError::Csv(_))));
    }

    #[test]
    fn test_chart_uses_region_set_domain() {
        let dashboard = build_dashboard(SAMPLE, TextEncoding::Utf8, &PipelineOptions::default()).unwrap();
        let spec = dashboard.chart(&RegionSelection::from_query("Andalucía"));

        assert_eq!(spec.encoding.color.scale.domain, dashboard.regions);
        assert_eq!(spec.default_regions(), vec!["Andalucía"]);
        assert_eq!(spec.data.values.len(), 2);
    }

    #[tokio::test]
    async fn test_load_dashboard_through_cache() {
        let cache = FetchCache::new();
        let options = PipelineOptions::default();

        let dashboard = load_dashboard(&cache, &StaticFetcher(SAMPLE), &options).await.unwrap();

        assert_eq!(dashboard.table.height(), 2);
        assert!(cache.get(&options.source.csv_url()).is_some());
    }
}
