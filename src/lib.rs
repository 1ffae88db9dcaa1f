// Compound Search Service - free-text and filtered search over biomedical compound records
// Builds storage-agnostic filters from request parameters and normalizes the stored documents

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod search;

pub use config::SearchConfig;
pub use errors::{SearchError, SearchResult};
pub use search::SearchService;
