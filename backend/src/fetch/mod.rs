//! Dataset download.
//!
//! [`Fetcher`] is the seam between the pipeline and the network. The HTTP
//! implementation makes one attempt plus at most one retry on transient
//! failures, and treats any non-success status as an error. [`FileFetcher`]
//! reads a local copy instead, for offline use and tests.

use std::future::Future;
use std::path::PathBuf;

use crate::api::logs::{log_info, log_warning};
use crate::config::FetchConfig;
use crate::error::{FetchError, FetchResult};

/// Source of raw CSV bytes.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = FetchResult<Vec<u8>>> + Send;
}

/// reqwest-backed fetcher.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn attempt(&self, url: &str) -> FetchResult<Vec<u8>> {
        let response = self.client.get(url).send().await.map_err(|e| classify(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| classify(e, url))?;
        Ok(bytes.to_vec())
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<Vec<u8>> {
        log_info(format!("Downloading {}", url));

        let mut retries_left = self.config.max_retries.min(1);
        loop {
            match self.attempt(url).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) if e.is_transient() && retries_left > 0 => {
                    retries_left -= 1;
                    log_warning(format!("{}; retrying once", e));
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn classify(e: reqwest::Error, url: &str) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(url.to_string())
    } else if let Some(status) = e.status() {
        FetchError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        }
    } else {
        FetchError::Request(e.to_string())
    }
}

/// Reads a fixed local file whatever URL is asked for.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Fetcher for FileFetcher {
    async fn fetch(&self, _url: &str) -> FetchResult<Vec<u8>> {
        log_info(format!("Reading {}", self.path.display()));
        Ok(tokio::fs::read(&self.path).await?)
    }
}

/// Fetcher chosen at startup: the live dataset or a local copy.
#[derive(Clone)]
pub enum DatasetFetcher {
    Http(HttpFetcher),
    File(FileFetcher),
}

impl Fetcher for DatasetFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<Vec<u8>> {
        match self {
            DatasetFetcher::Http(http) => http.fetch(url).await,
            DatasetFetcher::File(file) => file.fetch(url).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Local server answering `status` for the first `failures` hits, then 200.
    async fn flaky_server(failures: usize, status: StatusCode) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = axum::Router::new().route(
            "/data.csv",
            axum::routing::get(move || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < failures {
                        (status, "unavailable").into_response()
                    } else {
                        (StatusCode::OK, "periodo;Total\n2021;1,0\n").into_response()
                    }
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/data.csv", addr), hits)
    }

    #[tokio::test]
    async fn test_file_fetcher_reads_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"periodo;Total\n2021;1,0\n").unwrap();

        let fetcher = FileFetcher::new(file.path());
        let bytes = fetcher.fetch("ignored").await.unwrap();
        assert!(bytes.starts_with(b"periodo"));
    }

    #[tokio::test]
    async fn test_file_fetcher_missing_file() {
        let fetcher = DatasetFetcher::File(FileFetcher::new("/nonexistent/smokestats.csv"));
        let result = fetcher.fetch("ignored").await;
        assert!(matches!(result, Err(FetchError::IoError(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let fetcher = HttpFetcher::new(FetchConfig::default().with_retries(0)).unwrap();
        let result = fetcher.fetch("http://127.0.0.1:9/data.csv").await;
        assert!(matches!(
            result,
            Err(FetchError::Request(_)) | Err(FetchError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn test_server_error_retried_once() {
        let (url, hits) = flaky_server(1, StatusCode::SERVICE_UNAVAILABLE).await;
        let fetcher = HttpFetcher::new(FetchConfig::default()).unwrap();

        let bytes = fetcher.fetch(&url).await.unwrap();
        assert!(bytes.starts_with(b"periodo"));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_persistent_server_error_gives_up_after_retry() {
        let (url, hits) = flaky_server(usize::MAX, StatusCode::SERVICE_UNAVAILABLE).await;
        let fetcher = HttpFetcher::new(FetchConfig::default()).unwrap();

        let result = fetcher.fetch(&url).await;
        assert!(matches!(result, Err(FetchError::Status { status: 503, .. })));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_client_error_not_retried() {
        let (url, hits) = flaky_server(usize::MAX, StatusCode::NOT_FOUND).await;
        let fetcher = HttpFetcher::new(FetchConfig::default()).unwrap();

        let result = fetcher.fetch(&url).await;
        assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
