//! Dataset and fetch configuration.
//!
//! The dataset location and its column names are compile-time constants.
//! Only the HTTP shell (timeout, port) is adjustable at runtime.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// INE host serving the dataset.
pub const INE_HOST: &str = "www.ine.es";

/// Language segment of the download URL.
pub const INE_LANG: &str = "es";

/// Table path inside the INE catalogue.
pub const SMOKING_DATA_PATH: &str = "t00/ICV/dim3/l0";

/// Table identifier inside the INE catalogue.
pub const SMOKING_DATA_ID: &str = "33201";

/// Header of the compound "code + name" region column.
pub const REGION_COLUMN: &str = "Comunidades y Ciudades Autónomas";

/// Header of the national aggregate column.
pub const TOTAL_NATIONAL_COLUMN: &str = "Total Nacional";

/// Header of the period column.
pub const PERIOD_COLUMN: &str = "periodo";

/// Header of the value column.
pub const VALUE_COLUMN: &str = "Total";

/// Delimiter of the `csv_bdsc` export format.
pub const DATASET_DELIMITER: u8 = b';';

/// Chart height in pixels.
pub const CHART_HEIGHT: u32 = 450;

/// Default timeout for the dataset download.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Location of one INE table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSource {
    pub host: String,
    pub lang: String,
    pub path: String,
    pub id: String,
}

impl DatasetSource {
    /// The smoking-by-community table.
    pub fn smoking() -> Self {
        Self {
            host: INE_HOST.to_string(),
            lang: INE_LANG.to_string(),
            path: SMOKING_DATA_PATH.to_string(),
            id: SMOKING_DATA_ID.to_string(),
        }
    }

    /// URL of the semicolon-delimited CSV export (no header block).
    pub fn csv_url(&self) -> String {
        format!(
            "https://{}/jaxi/files/_px/{}/csv_bdsc/{}/{}.csv_bdsc?nocab=1",
            self.host, self.lang, self.path, self.id
        )
    }

    /// Browsable page of the same table, used for attribution.
    pub fn web_url(&self) -> String {
        format!(
            "https://{}/jaxi/Tabla.htm?path=/{}/&file={}.px&L=0",
            self.host, self.path, self.id
        )
    }
}

impl Default for DatasetSource {
    fn default() -> Self {
        Self::smoking()
    }
}

/// Header names of the four columns the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    pub region: String,
    pub total_national: String,
    pub period: String,
    pub value: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            region: REGION_COLUMN.to_string(),
            total_national: TOTAL_NATIONAL_COLUMN.to_string(),
            period: PERIOD_COLUMN.to_string(),
            value: VALUE_COLUMN.to_string(),
        }
    }
}

/// HTTP fetch policy.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Extra attempts after a transient failure (clamped to 1).
    pub max_retries: u32,
    pub user_agent: String,
}

impl FetchConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries.min(1);
        self
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
            max_retries: 1,
            user_agent: format!("smokestats/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_url_template() {
        let source = DatasetSource::smoking();
        assert_eq!(
            source.csv_url(),
            "https://www.ine.es/jaxi/files/_px/es/csv_bdsc/t00/ICV/dim3/l0/33201.csv_bdsc?nocab=1"
        );
    }

    #[test]
    fn test_web_url_template() {
        let source = DatasetSource::smoking();
        assert_eq!(
            source.web_url(),
            "https://www.ine.es/jaxi/Tabla.htm?path=/t00/ICV/dim3/l0/&file=33201.px&L=0"
        );
    }

    #[test]
    fn test_retries_clamped() {
        let config = FetchConfig::default().with_retries(5);
        assert_eq!(config.max_retries, 1);
    }
}
