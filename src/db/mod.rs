// Compound storage - the seam between the search service and the document store
pub mod memory;
pub mod postgres;

use crate::{
    errors::SearchResult,
    search::{
        filter::{Filter, FindOptions},
        schema::RawCompound,
    },
};
use async_trait::async_trait;

pub use memory::MemoryCompoundStore;
pub use postgres::{DatabaseConfig, PgCompoundStore};

#[async_trait]
pub trait CompoundStore: Send + Sync {
    /// Backend identifier used in logs (postgres, memory, ...)
    fn id(&self) -> &'static str;

    /// Return the raw records matching `filter`, sorted ascending by
    /// `compound_name` (unnamed records first) and capped at `options.limit`.
    async fn find(&self, filter: &Filter, options: &FindOptions) -> SearchResult<Vec<RawCompound>>;
}
