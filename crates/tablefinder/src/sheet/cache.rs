//! Time-bounded cache of the parsed guest sheet.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use super::{Dataset, SheetColumns, SheetSource};
use crate::config::SheetConfig;
use crate::error::Result;

/// Holds the current [`Dataset`] and refreshes it when it gets too old.
///
/// The staleness check, the fetch, and the swap all happen under one lock: a
/// burst of requests past a stale cache produces a single upstream fetch, and
/// every caller gets a complete snapshot.
#[derive(Debug)]
pub struct SheetCache {
    source: Arc<dyn SheetSource>,
    columns: SheetColumns,
    max_age: Duration,
    serve_stale_on_error: bool,
    current: Mutex<Option<Arc<Dataset>>>,
}

impl SheetCache {
    /// Create an empty cache over `source`.
    #[must_use]
    pub fn new(source: Arc<dyn SheetSource>, columns: SheetColumns, max_age: Duration) -> Self {
        Self {
            source,
            columns,
            max_age,
            serve_stale_on_error: false,
            current: Mutex::new(None),
        }
    }

    /// Create an empty cache configured from the sheet section.
    #[must_use]
    pub fn from_config(source: Arc<dyn SheetSource>, config: &SheetConfig) -> Self {
        Self::new(
            source,
            SheetColumns::from(config),
            config.cache_interval(),
        )
        .serve_stale_on_error(config.serve_stale_on_error)
    }

    /// Keep returning the previous dataset when a refresh fails.
    #[must_use]
    pub fn serve_stale_on_error(mut self, enabled: bool) -> Self {
        self.serve_stale_on_error = enabled;
        self
    }

    /// Return a current dataset, fetching a new one if the cache is empty or
    /// older than the configured interval.
    ///
    /// # Errors
    ///
    /// Returns the fetch or parse error. With `serve_stale_on_error` the
    /// previous dataset is returned instead, when there is one.
    pub async fn refresh(&self) -> Result<Arc<Dataset>> {
        let mut current = self.current.lock().await;

        if let Some(dataset) = current.as_ref() {
            if !dataset.is_stale(self.max_age) {
                return Ok(Arc::clone(dataset));
            }
        }

        match self.load().await {
            Ok(dataset) => {
                tracing::info!(
                    source = %self.source.describe(),
                    records = dataset.len(),
                    "Loaded guest sheet"
                );
                let dataset = Arc::new(dataset);
                *current = Some(Arc::clone(&dataset));
                Ok(dataset)
            }
            Err(err) => match current.as_ref() {
                Some(stale) if self.serve_stale_on_error => {
                    tracing::warn!(
                        error = %err,
                        fetched_at = %stale.fetched_at(),
                        "Sheet refresh failed, serving previous data"
                    );
                    Ok(Arc::clone(stale))
                }
                _ => {
                    tracing::error!(error = %err, "Sheet refresh failed");
                    Err(err)
                }
            },
        }
    }

    /// The cached dataset, without refreshing.
    pub async fn snapshot(&self) -> Option<Arc<Dataset>> {
        self.current.lock().await.clone()
    }

    async fn load(&self) -> Result<Dataset> {
        let text = self.source.fetch().await?;
        Dataset::from_csv(&text, &self.columns)
    }
}
