//! Query endpoints

use axum::{extract::State, Form, Json};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{SearchRequest, SearchResponse};

/// POST /search - Query from a URL-encoded form
pub async fn search_form(
    State(state): State<AppState>,
    Form(request): Form<SearchRequest>,
) -> Result<Json<SearchResponse>> {
    run_search(&state, request).await
}

/// POST /search-json - Query from a JSON body
pub async fn search_json(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>> {
    run_search(&state, request).await
}

async fn run_search(state: &AppState, request: SearchRequest) -> Result<Json<SearchResponse>> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(Error::validation("Query cannot be empty"));
    }

    tracing::info!(
        include_confidence = request.include_confidence,
        include_enrichment = request.include_enrichment,
        "Query: \"{}\"",
        query
    );

    let response = state
        .pipeline()
        .search_and_answer(query, request.include_confidence, request.include_enrichment)
        .await;

    Ok(Json(response))
}
