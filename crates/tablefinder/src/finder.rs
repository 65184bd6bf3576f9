//! Name → table lookups against the cached guest sheet.

use std::sync::Arc;

use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::matcher::Matcher;
use crate::sheet::{Dataset, HttpSheetSource, SheetCache, SheetSource, TableId};

/// Result of a non-empty lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupOutcome {
    /// A guest matched the query.
    Found {
        /// The matched name as written in the sheet.
        name: String,
        /// The guest's table.
        table: TableId,
        /// Similarity score, 0-100.
        score: f64,
    },
    /// Nobody scored above the threshold.
    NotFound,
}

impl LookupOutcome {
    /// Whether a guest was found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

/// Ties the sheet cache and the matcher together.
#[derive(Debug)]
pub struct TableFinder {
    cache: SheetCache,
    matcher: Matcher,
}

impl TableFinder {
    /// Create a finder from its parts.
    #[must_use]
    pub fn new(cache: SheetCache, matcher: Matcher) -> Self {
        Self { cache, matcher }
    }

    /// Create a finder that reads `source` with the configured cache and matcher.
    #[must_use]
    pub fn with_source(source: Arc<dyn SheetSource>, config: &Config) -> Self {
        Self::new(
            SheetCache::from_config(source, &config.sheet),
            Matcher::from(&config.matcher),
        )
    }

    /// Create a finder over the published sheet over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = HttpSheetSource::from_config(&config.sheet)?;
        Ok(Self::with_source(Arc::new(source), config))
    }

    /// Look up a guest by name.
    ///
    /// The query is trimmed first. An empty query returns `Ok(None)` without
    /// touching the sheet.
    ///
    /// # Errors
    ///
    /// Returns an error if the sheet needs a refresh and the refresh fails.
    pub async fn lookup(&self, query: &str) -> Result<Option<LookupOutcome>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let dataset = self.cache.refresh().await?;
        let outcome = match self.matcher.find(query, dataset.names()) {
            Some(found) => {
                let record = &dataset.records()[found.index];
                LookupOutcome::Found {
                    name: record.name.clone(),
                    table: record.table.clone(),
                    score: found.score,
                }
            }
            None => LookupOutcome::NotFound,
        };

        tracing::debug!(query, ?outcome, "Lookup");
        Ok(Some(outcome))
    }

    /// The dataset currently cached, without refreshing it.
    pub async fn cached(&self) -> Option<Arc<Dataset>> {
        self.cache.snapshot().await
    }
}
