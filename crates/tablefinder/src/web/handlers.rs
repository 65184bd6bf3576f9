//! Route handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;

use super::template::render_page;
use super::AppState;
use crate::error::Result;

/// Query string of `GET /lookup`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LookupParams {
    /// The typed name; absent is the same as empty.
    pub q: String,
}

impl LookupParams {
    /// Pick `q` out of decoded query pairs. The first `q` wins; other keys
    /// are ignored.
    #[must_use]
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let q = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "q").then_some(value))
            .unwrap_or_default();
        Self { q }
    }
}

/// GET / - the empty search form
pub async fn show_form(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_page(&state.page, "", None))
}

/// GET /lookup?q= - search and show the guest's table
pub async fn lookup(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Html<String>> {
    let params = LookupParams::from_pairs(pairs);
    let query = params.q.trim();
    let outcome = state.finder.lookup(query).await?;
    Ok(Html(render_page(&state.page, query, outcome.as_ref())))
}
