//! Mosaic HTTP serving layer
//!
//! Exposes the read-side query surface plus the tagging trigger:
//! `/single`, `/listings`, `/getsimilar`, `/search`, `/initialize-discover`,
//! `/process-unprocessed`, `/jobs/{id}`, `/health`.

mod error;
mod handlers;
mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Build the API router with all routes.
pub fn build_router(app_state: AppState, allowed_origins: &[String]) -> Router {
    let cors = build_cors_layer(allowed_origins);

    Router::new()
        .route("/single", get(handlers::records::single))
        .route("/listings", get(handlers::records::listings))
        .route("/getsimilar", get(handlers::search::get_similar))
        .route("/search", get(handlers::search::search))
        .route("/initialize-discover", get(handlers::records::discover))
        .route(
            "/process-unprocessed",
            post(handlers::tagging::process_unprocessed),
        )
        .route("/jobs/{id}", get(handlers::tagging::job_status))
        .route("/health", get(handlers::health::check))
        .with_state(app_state)
        .layer(cors)
}

fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let headers = [ORIGIN, ACCEPT, CONTENT_TYPE, AUTHORIZATION];

    if allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
}

/// Start the HTTP server.
pub async fn start(app_state: AppState, port: u16, allowed_origins: &[String]) -> anyhow::Result<()> {
    let app = build_router(app_state, allowed_origins);
    let bind_addr = format!("0.0.0.0:{}", port);

    info!("Starting server on {}", &bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use mosaic_core::{
        ChatMessage, JobRegistry, LlmClient, Record, RecordContent, RecordKind, RecordMetadata,
        RecordSource, RecordStore, Result, ScraperMetadata, ServingLayer, SqliteStore,
        TagClassifier, TagVocabulary, VectorIndex,
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct StubLlm;

    #[async_trait]
    impl LlmClient for StubLlm {
        async fn chat_completion(&self, _messages: Vec<ChatMessage>) -> Result<String> {
            Ok("{\"tags\": [\"LLMs\"]}".to_string())
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        fn embedding_dimensions(&self) -> usize {
            2
        }

        fn model_name(&self) -> &str {
            "stub"
        }
    }

    fn record(id: &str, title: &str) -> Record {
        Record {
            id: id.to_string(),
            kind: RecordKind::Article,
            source: RecordSource::default(),
            metadata: RecordMetadata {
                title: title.to_string(),
                ..Default::default()
            },
            content: RecordContent {
                description: "about AI".to_string(),
                ..Default::default()
            },
            raw_text: None,
            scraper_metadata: ScraperMetadata::default(),
            assigned_tags: None,
            tags_assigned_at: None,
            coords: None,
        }
    }

    fn vocabulary() -> TagVocabulary {
        serde_json::from_value(serde_json::json!({
            "namespace": "ai-content",
            "custom_tags": [{
                "category": "AI Domain",
                "tags": [{"name": "LLMs"}]
            }]
        }))
        .unwrap()
    }

    fn app() -> (Arc<SqliteStore>, Router) {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        store.initialize().unwrap();

        let llm = Arc::new(StubLlm);
        let serving = Arc::new(ServingLayer::new(
            store.clone(),
            store.clone(),
            llm.clone(),
        ));
        let classifier = Arc::new(TagClassifier::new(llm, Arc::new(vocabulary()), 15000));

        let state = AppState {
            serving,
            store: store.clone(),
            classifier,
            jobs: Arc::new(JobRegistry::new()),
            batch_limit: 5000,
        };

        (store, build_router(state, &[]))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn single_returns_record_without_coords() {
        let (store, app) = app();
        let mut rec = record("r1", "A record");
        rec.coords = Some(vec![1.0, 2.0]);
        store.insert(&rec).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/single?id=r1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["id"], "r1");
        assert!(json.get("coords").is_none());
    }

    #[tokio::test]
    async fn single_missing_record_is_404_with_error_body() {
        let (_store, app) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/single?id=ghost")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn listings_paginates_with_totals() {
        let (store, app) = app();
        for i in 0..5 {
            store.insert(&record(&format!("r{}", i), "t")).unwrap();
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/listings?page=1&page_size=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["total_count"], 5);
        assert_eq!(json["total_pages"], 3);
        assert_eq!(json["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn listings_rejects_oversized_page_size() {
        let (_store, app) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/listings?page=1&page_size=9999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn search_skips_dangling_vector_hits() {
        let (store, app) = app();
        store.insert(&record("kept", "kept")).unwrap();
        store.upsert("kept", "m", &[1.0, 0.0]).unwrap();
        store.upsert("dangling", "m", &[0.9, 0.1]).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/search?query=ai")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let results = json.as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["id"], "kept");
    }

    #[tokio::test]
    async fn process_unprocessed_queues_job_and_completes() {
        let (store, app) = app();
        store.insert(&record("u1", "untagged")).unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/process-unprocessed")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let json = body_json(response).await;
        assert_eq!(json["records_queued"], 1);
        let job_id = json["job_id"].as_u64().unwrap();

        // The spawned batch finishes quickly with stub collaborators
        let mut done = false;
        for _ in 0..50 {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .uri(format!("/jobs/{}", job_id))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            let json = body_json(response).await;
            if json["status"] == "done" {
                assert_eq!(json["report"]["success"], 1);
                done = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(done, "tagging job never completed");

        let tagged = store.get("u1").unwrap().unwrap();
        assert_eq!(tagged.assigned_tags, Some(vec!["LLMs".to_string()]));
    }

    #[tokio::test]
    async fn process_unprocessed_with_nothing_to_do_reports_zero() {
        let (_store, app) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/process-unprocessed")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let json = body_json(response).await;
        assert_eq!(json["records_queued"], 0);
        assert!(json.get("job_id").is_none());
    }

    #[tokio::test]
    async fn health_reports_connected_store() {
        let (_store, app) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["database"], "connected");
    }

    #[tokio::test]
    async fn discover_returns_projected_points() {
        let (store, app) = app();
        let mut rec = record("d1", "mapped");
        rec.coords = Some(vec![0.1, 0.2]);
        store.insert(&rec).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/initialize-discover")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let points = json.as_array().unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0]["id"], "d1");
        assert_eq!(points[0]["type"], "Article");
        assert_eq!(points[0]["name"], "mapped");
    }
}
