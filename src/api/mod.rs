mod dto;
mod error;
mod handlers;
mod state;
mod web;

pub use state::AppState;

use axum::{
    Router,
    routing::{get, post},
};
use docqa_store::Embedder;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::engine::Generator;

/// Build the application router
pub fn router<E, G>(state: Arc<AppState<E, G>>) -> Router
where
    E: Embedder + 'static,
    G: Generator + 'static,
{
    Router::new()
        // HTML
        .route("/", get(web::index::<E, G>))
        .route("/ask", post(web::ask_html::<E, G>))
        .route("/reindex", post(web::reindex_html::<E, G>))
        // JSON
        .route("/api/files", get(handlers::list_files::<E, G>))
        .route("/api/ask", post(handlers::ask::<E, G>))
        .route("/api/reindex", post(handlers::reindex::<E, G>))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RetrievalConfig;
    use crate::engine::testing::{
        EchoGenerator, Fixture, RenamedEmbedder, WordEmbedder, empty_fixture, indexed_fixture,
    };
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use std::fs;
    use tower::ServiceExt;

    fn app(fx: &Fixture) -> Router {
        let state = AppState::new(
            WordEmbedder,
            EchoGenerator::default(),
            fx.store.clone(),
            fx.config.clone(),
            RetrievalConfig::default(),
        );
        router(Arc::new(state))
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, String) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_form(uri: &str, body: &'static str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let fx = empty_fixture();
        let (status, body) = send(&app(&fx), get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_files() {
        let fx = indexed_fixture().await;
        fs::write(fx.docs.path().join("later.txt"), "added after indexing").unwrap();

        let (status, body) = send(&app(&fx), get_req("/api/files")).await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["count"], 3);
        assert_eq!(v["files"][0], json!({"name": "later.txt", "kind": "text", "indexed": false}));
        assert_eq!(v["files"][1]["name"], "notes.txt");
        assert_eq!(v["files"][1]["indexed"], true);
        assert_eq!(v["files"][2]["kind"], "pdf");
    }

    #[tokio::test]
    async fn test_ask_json() {
        let fx = indexed_fixture().await;
        let req = post_json(
            "/api/ask",
            json!({"file": "notes.txt", "question": "What colour is the lighthouse?"}),
        );

        let (status, body) = send(&app(&fx), req).await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["file"], "notes.txt");
        assert!(v["answer"].as_str().unwrap().contains("painted red and white"));
        let sources = v["sources"].as_array().unwrap();
        assert!(!sources.is_empty() && sources.len() <= 4);
        assert!(sources.iter().all(|s| s["source"] == "notes.txt"));
    }

    #[tokio::test]
    async fn test_ask_empty_question_is_bad_request() {
        let fx = indexed_fixture().await;
        let req = post_json("/api/ask", json!({"file": "notes.txt", "question": "   "}));

        let (status, body) = send(&app(&fx), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_ask_unindexed_file_is_not_found() {
        let fx = indexed_fixture().await;
        let req = post_json("/api/ask", json!({"file": "ghost.txt", "question": "Anyone?"}));

        let (status, body) = send(&app(&fx), req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["error"], "not_found");
        assert!(v["message"].as_str().unwrap().contains("ghost.txt"));
    }

    #[tokio::test]
    async fn test_reindex_json_second_pass_skips() {
        let fx = empty_fixture();
        fs::write(fx.docs.path().join("a.txt"), "alpha beta gamma").unwrap();
        let app = app(&fx);

        let (status, body) = send(&app, post_form("/api/reindex", "")).await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["files"][0], json!({"file_name": "a.txt", "outcome": "indexed", "chunks": 1}));

        let (_, body) = send(&app, post_form("/api/reindex", "")).await;
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["files"][0]["outcome"], "skipped");
    }

    #[tokio::test]
    async fn test_chat_page_lists_files() {
        let fx = indexed_fixture().await;
        let (status, body) = send(&app(&fx), get_req("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("notes.txt"));
        assert!(body.contains("report.pdf"));
    }

    #[tokio::test]
    async fn test_ask_form_renders_answer() {
        let fx = indexed_fixture().await;
        let req = post_form("/ask", "file=notes.txt&question=What+colour+is+the+lighthouse%3F");

        let (status, body) = send(&app(&fx), req).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("painted red and white"));
        assert!(body.contains("What colour is the lighthouse?"));
    }

    #[tokio::test]
    async fn test_ask_form_errors_render_inline() {
        let fx = indexed_fixture().await;
        let app = app(&fx);

        let (status, body) = send(&app, post_form("/ask", "question=Hello")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Select a file first"));

        let (status, body) = send(&app, post_form("/ask", "file=ghost.txt&question=Hello")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("has not been indexed yet"));
    }

    #[tokio::test]
    async fn test_ask_form_missing_question_renders_inline() {
        let fx = indexed_fixture().await;
        let (status, body) = send(&app(&fx), post_form("/ask", "file=notes.txt")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Question cannot be empty"));
    }

    #[tokio::test]
    async fn test_changed_embedding_model_is_reported() {
        let fx = indexed_fixture().await;
        let state = AppState::new(
            RenamedEmbedder("some-other-model"),
            EchoGenerator::default(),
            fx.store.clone(),
            fx.config.clone(),
            RetrievalConfig::default(),
        );
        let app = router(Arc::new(state));

        let req = post_json("/api/ask", json!({"file": "notes.txt", "question": "Lighthouse?"}));
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert!(v["message"].as_str().unwrap().contains("word-hash-test"));

        let (status, body) = send(&app, post_form("/ask", "file=notes.txt&question=Lighthouse%3F")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("some-other-model"));
    }

    #[tokio::test]
    async fn test_reindex_form_summarises_pass() {
        let fx = empty_fixture();
        fs::write(fx.docs.path().join("a.txt"), "alpha beta gamma").unwrap();
        fs::write(fx.docs.path().join("empty.txt"), "").unwrap();

        let (status, body) = send(&app(&fx), post_form("/reindex", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("a.txt"));
        assert!(body.contains("1 indexed"));
        assert!(body.contains("1 failed"));
    }
}
