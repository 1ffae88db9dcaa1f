// Search Module
pub mod filter;
pub mod normalize;
pub mod schema;
pub mod service;

pub use filter::{build_filter, Field, Filter, FindOptions, SearchParams, RESULT_LIMIT};
pub use normalize::normalize;
pub use schema::*;
pub use service::SearchService;
