//! Memoized dataset text, keyed by URL.
//!
//! Entries live for the whole process and are never invalidated: the INE
//! table changes a few times a year. Each key owns a `OnceCell`, so
//! concurrent first requests for the same URL share a single download.
//! Failed downloads leave the cell empty and are retried on the next call.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

use crate::api::logs::log_info;
use crate::error::PipelineError;
use crate::fetch::Fetcher;
use crate::parser::{decode_content, TextEncoding};

/// Decoded dataset plus the encoding that was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedText {
    pub text: Arc<str>,
    pub encoding: TextEncoding,
}

/// Process-wide fetch cache. Share it behind an `Arc`.
#[derive(Default)]
pub struct FetchCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<CachedText>>>>,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached text for `url`, downloading and decoding it on first use.
    pub async fn get_or_fetch<F: Fetcher>(
        &self,
        url: &str,
        fetcher: &F,
        encoding: TextEncoding,
    ) -> Result<CachedText, PipelineError> {
        let cell = self.cell(url);

        if let Some(hit) = cell.get() {
            log_info(format!("Using cached dataset for {}", url));
            return Ok(hit.clone());
        }

        let entry = cell
            .get_or_try_init(|| async {
                let bytes = fetcher.fetch(url).await?;
                let (text, used) = decode_content(&bytes, encoding)?;
                Ok::<_, PipelineError>(CachedText {
                    text: Arc::from(text),
                    encoding: used,
                })
            })
            .await?;

        Ok(entry.clone())
    }

    /// Cached text without fetching.
    pub fn get(&self, url: &str) -> Option<CachedText> {
        let entries = self.entries.lock().ok()?;
        entries.get(url).and_then(|cell| cell.get().cloned())
    }

    /// Number of URLs with a successfully cached body.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .map(|entries| entries.values().filter(|c| c.initialized()).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell(&self, url: &str) -> Arc<OnceCell<CachedText>> {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries
            .entry(url.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, FetchResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingFetcher {
        body: &'static [u8],
        calls: AtomicUsize,
        fail_first: bool,
    }

    impl CountingFetcher {
        fn new(body: &'static [u8]) -> Self {
            Self {
                body,
                calls: AtomicUsize::new(0),
                fail_first: false,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Fetcher for CountingFetcher {
        async fn fetch(&self, url: &str) -> FetchResult<Vec<u8>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            if self.fail_first && n == 0 {
                return Err(FetchError::Status {
                    status: 503,
                    url: url.to_string(),
                });
            }
            Ok(self.body.to_vec())
        }
    }

    #[tokio::test]
    async fn test_second_call_is_cached() {
        let cache = FetchCache::new();
        let fetcher = CountingFetcher::new(b"periodo;Total\n");

        let first = cache.get_or_fetch("u", &fetcher, TextEncoding::Utf8).await.unwrap();
        let second = cache.get_or_fetch("u", &fetcher, TextEncoding::Utf8).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache = FetchCache::new();
        let fetcher = CountingFetcher::new(b"a;b\n");

        cache.get_or_fetch("u1", &fetcher, TextEncoding::Utf8).await.unwrap();
        cache.get_or_fetch("u2", &fetcher, TextEncoding::Utf8).await.unwrap();

        assert_eq!(fetcher.calls(), 2);
        assert!(cache.get("u1").is_some());
        assert!(cache.get("u3").is_none());
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = FetchCache::new();
        let fetcher = CountingFetcher {
            fail_first: true,
            ..CountingFetcher::new(b"a;b\n")
        };

        let first = cache.get_or_fetch("u", &fetcher, TextEncoding::Utf8).await;
        assert!(matches!(first, Err(PipelineError::Fetch(_))));
        assert!(cache.is_empty());

        let second = cache.get_or_fetch("u", &fetcher, TextEncoding::Utf8).await;
        assert!(second.is_ok());
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_first_requests_fetch_once() {
        let cache = Arc::new(FetchCache::new());
        let fetcher = Arc::new(CountingFetcher::new(b"a;b\n"));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let fetcher = Arc::clone(&fetcher);
                tokio::spawn(async move {
                    cache
                        .get_or_fetch("u", fetcher.as_ref(), TextEncoding::Utf8)
                        .await
                        .map(|c| c.text.len())
                })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), 4);
        }
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_bytes_are_parse_errors() {
        let cache = FetchCache::new();
        let fetcher = CountingFetcher::new(&[0x61, 0xFF]);

        let result = cache.get_or_fetch("u", &fetcher, TextEncoding::Utf8).await;
        assert!(matches!(result, Err(PipelineError::Csv(_))));
    }
}
