//! HTTP surface tests driven through the router

mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{happy_llm, test_config, TopicEmbedder};
use enrich_rag::providers::InMemoryVectorStore;
use enrich_rag::server::{state::AppState, RagServer};

fn router() -> Router {
    let state = AppState::with_providers(
        test_config(),
        Arc::new(TopicEmbedder { fail: false }),
        Arc::new(InMemoryVectorStore::new()),
        happy_llm(),
    );
    RagServer::with_state(state).build_router()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn upload(filename: &str, content_type: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--BOUNDARY\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
         Content-Type: {}\r\n\r\n\
         {}\r\n\
         --BOUNDARY--\r\n",
        filename, content_type, content
    );
    Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=BOUNDARY")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&router(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_ready_with_healthy_providers() {
    let (status, _) = send(&router(), get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_upload_search_delete_flow() {
    let router = router();

    let (status, meta) = send(
        &router,
        upload("pump-manual.txt", "text/plain", "To reset the pump, hold the reset button."),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(meta["filename"], "pump-manual.txt");
    assert_eq!(meta["chunk_count"], 1);
    assert_eq!(meta["processing_status"]["state"], "completed");

    let (status, docs) = send(&router, get("/documents")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(docs.as_array().unwrap().len(), 1);

    let (status, answer) = send(
        &router,
        json_request(Method::POST, "/search-json", json!({"query": "How do I reset the pump?"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(answer["confidence_level"], "medium");
    assert_eq!(answer["sources"][0]["filename"], "pump-manual.txt");
    assert_eq!(answer["missing_info"][0]["type"], "specific_fact");

    let form = Request::builder()
        .method(Method::POST)
        .uri("/search")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("query=How+do+I+reset+the+pump%3F&include_enrichment=false"))
        .unwrap();
    let (status, answer) = send(&router, form).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(answer["enrichment_suggestions"], json!([]));

    let (status, stats) = send(&router, get("/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_documents"], 1);
    assert_eq!(stats["total_chunks"], 1);

    let delete = Request::builder()
        .method(Method::DELETE)
        .uri("/documents/pump-manual.txt")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&router, delete).await;
    assert_eq!(status, StatusCode::OK);

    let (status, answer) = send(
        &router,
        json_request(Method::POST, "/search-json", json!({"query": "How do I reset the pump?"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(answer["enrichment_suggestions"][0]["type"], "document_upload");
}

#[tokio::test]
async fn test_upload_rejects_extension() {
    let (status, body) = send(&router(), upload("deck.pptx", "application/octet-stream", "x")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "validation_error");
}

#[tokio::test]
async fn test_blank_query_rejected() {
    let (status, body) = send(
        &router(),
        json_request(Method::POST, "/search-json", json!({"query": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Query cannot be empty");
}

#[tokio::test]
async fn test_delete_unknown_document() {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/documents/missing.pdf")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router(), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "not_found");
}

#[tokio::test]
async fn test_ratings() {
    let router = router();

    let (status, _) = send(
        &router,
        json_request(Method::POST, "/rate-answer", json!({"query": "q", "rating": 7})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for (rating, expected_id) in [(4, 1), (5, 2)] {
        let (status, body) = send(
            &router,
            json_request(
                Method::POST,
                "/rate-answer",
                json!({"query": "q", "rating": rating, "feedback": "helpful"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rating_id"], expected_id);
    }

    let (_, ratings) = send(&router, get("/ratings")).await;
    assert_eq!(ratings["total"], 2);
    assert_eq!(ratings["ratings"][0]["feedback"], "helpful");

    let (_, stats) = send(&router, get("/stats")).await;
    assert_eq!(stats["total_ratings"], 2);
    assert_eq!(stats["average_rating"], 4.5);
}
