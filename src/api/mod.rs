//! REST API endpoints for compound search
//!
//! A single read-only search endpoint plus a health check. Handlers expect a
//! `web::Data<SearchService>` registered on the app.

pub mod search;

pub use search::{search_routes, SearchResponse};
