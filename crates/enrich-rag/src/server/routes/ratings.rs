//! Answer rating and statistics endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::Result;
use crate::learning::RatingRecord;
use crate::server::state::AppState;
use crate::types::AnswerRating;

/// Rating log returned by GET /ratings
#[derive(Debug, Serialize)]
pub struct RatingsResponse {
    pub ratings: Vec<RatingRecord>,
    pub total: usize,
}

/// Knowledge-base counters returned by GET /stats
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_documents: usize,
    pub total_chunks: usize,
    pub total_ratings: usize,
    pub average_rating: f64,
}

/// POST /rate-answer - Record a rating for an answer
pub async fn rate_answer(
    State(state): State<AppState>,
    Json(rating): Json<AnswerRating>,
) -> Result<Json<Value>> {
    let rating_id = state.ratings().record(rating)?;

    Ok(Json(json!({
        "message": "Rating recorded successfully",
        "rating_id": rating_id,
    })))
}

/// GET /ratings - All recorded ratings
pub async fn list_ratings(State(state): State<AppState>) -> Json<RatingsResponse> {
    let ratings = state.ratings().all();
    Json(RatingsResponse {
        total: ratings.len(),
        ratings,
    })
}

/// GET /stats - Document, chunk, and rating totals
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let documents = state.processor().list_documents().await?;

    Ok(Json(StatsResponse {
        total_documents: documents.len(),
        total_chunks: documents.iter().map(|d| d.chunk_count as usize).sum(),
        total_ratings: state.ratings().len(),
        average_rating: state.ratings().average(),
    }))
}
