// Search Error Types
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type SearchResult<T> = Result<T, SearchError>;

/// Message returned to callers for every failed search
pub const SEARCH_FAILED_MESSAGE: &str = "Failed to perform search";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn search_failed() -> Self {
        Self {
            error: SEARCH_FAILED_MESSAGE.to_string(),
        }
    }
}

// Connectivity, malformed query and timeout failures all collapse into one response.
impl ResponseError for SearchError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::search_failed())
    }
}
