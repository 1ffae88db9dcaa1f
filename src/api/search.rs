//! Search API endpoints

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info};

use crate::{
    errors::SearchError,
    search::{CompoundRecord, SearchParams, SearchService},
};

/// Search response
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<CompoundRecord>,
}

/// `GET /api/search?query=&evidenceType=&disease=&confidenceScore=`
///
/// The query string is taken as raw pairs so a repeated key keeps its first
/// value instead of failing the request.
async fn search(
    service: web::Data<SearchService>,
    pairs: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, SearchError> {
    let start = Instant::now();
    let params = SearchParams::from_pairs(pairs.into_inner());

    info!(
        "Search request: query={:?}, evidence_type={:?}, disease={:?}, confidence_score={:?}",
        params.query, params.evidence_type, params.disease, params.confidence_score
    );

    let results = service.search(&params).await.map_err(|e| {
        error!("Search error: {}", e);
        e
    })?;

    info!(
        "Search completed: results={}, store={}, time={}ms",
        results.len(),
        service.store_id(),
        start.elapsed().as_millis()
    );

    Ok(HttpResponse::Ok().json(SearchResponse { results }))
}

/// Health check endpoint; does not touch the store
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "compound-search",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Register the search and health routes
pub fn search_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/search", web::get().to(search))
        .route("/health", web::get().to(health));
}
