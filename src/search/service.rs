// Search Service - builds the filter, runs it against the injected store and normalizes the results
use super::{
    filter::{build_filter, FindOptions, SearchParams},
    normalize::normalize_all,
    schema::CompoundRecord,
};
use crate::{db::CompoundStore, errors::SearchResult};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct SearchService {
    store: Arc<dyn CompoundStore>,
    options: FindOptions,
}

impl SearchService {
    pub fn new(store: Arc<dyn CompoundStore>) -> Self {
        Self {
            store,
            options: FindOptions::default(),
        }
    }

    pub fn store_id(&self) -> &'static str {
        self.store.id()
    }

    /// Run one search. Either every matching record (up to the limit) comes back
    /// normalized, or the store error is returned as-is; there are no retries.
    pub async fn search(&self, params: &SearchParams) -> SearchResult<Vec<CompoundRecord>> {
        let filter = build_filter(params);
        debug!(store = self.store.id(), filter = %filter, "Built search filter");

        let raw = self.store.find(&filter, &self.options).await?;
        Ok(normalize_all(raw))
    }
}
