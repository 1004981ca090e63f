//! API routes for the RAG server

pub mod documents;
pub mod ratings;
pub mod search;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::server::state::AppState;

/// Room for multipart framing around the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build all API routes
pub fn api_routes(max_file_size: usize) -> Router<AppState> {
    Router::new()
        // Documents - body limit above the file cap so oversize files get a 400
        .route(
            "/upload",
            post(documents::upload_document)
                .layer(DefaultBodyLimit::max(max_file_size + MULTIPART_OVERHEAD)),
        )
        .route("/documents", get(documents::list_documents))
        .route("/documents/:filename", delete(documents::delete_document))
        // Query
        .route("/search", post(search::search_form))
        .route("/search-json", post(search::search_json))
        // Feedback
        .route("/rate-answer", post(ratings::rate_answer))
        .route("/ratings", get(ratings::list_ratings))
        .route("/stats", get(ratings::stats))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> Json<Value> {
    Json(json!({
        "name": "enrich-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Knowledge-base QA with completeness scoring and enrichment suggestions",
        "endpoints": {
            "POST /upload": "Upload and index a document (.pdf, .txt, .docx, .xlsx, .csv)",
            "POST /search": "Ask a question (form fields)",
            "POST /search-json": "Ask a question (JSON body)",
            "GET /documents": "List indexed documents",
            "DELETE /documents/:filename": "Delete a document",
            "POST /rate-answer": "Rate an answer (1-5)",
            "GET /ratings": "List answer ratings",
            "GET /stats": "Knowledge-base statistics",
            "GET /health": "Liveness check",
            "GET /ready": "Model backend readiness"
        }
    }))
}
