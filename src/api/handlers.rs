use axum::{Json, extract::State};
use doc_indexer::PipelineReport;
use docqa_store::Embedder;
use std::sync::Arc;

use super::dto::{self, *};
use super::error::ApiError;
use super::state::AppState;
use crate::engine::{Generator, session};

/// POST /api/ask - Ask a question about one indexed file
pub async fn ask<E: Embedder, G: Generator>(
    State(state): State<Arc<AppState<E, G>>>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let (file, question) = validate(&req.file, &req.question)?;

    let answer = session::ask(
        question,
        file,
        &state.embedder,
        &state.llm,
        &state.store,
        &state.retrieval,
    )
    .await?;

    Ok(Json(AskResponse {
        sources: dto::build_sources(&answer.sources),
        file: answer.file_name,
        answer: answer.answer,
    }))
}

/// Trimmed (file, question), both required
pub(super) fn validate<'a>(file: &'a str, question: &'a str) -> Result<(&'a str, &'a str), ApiError> {
    let file = file.trim();
    if file.is_empty() {
        return Err(ApiError::BadRequest("Select a file first".into()));
    }
    let question = question.trim();
    if question.is_empty() {
        return Err(ApiError::BadRequest("Question cannot be empty".into()));
    }
    Ok((file, question))
}

/// GET /api/files - Files in the watched folder
pub async fn list_files<E: Embedder, G: Generator>(
    State(state): State<Arc<AppState<E, G>>>,
) -> Json<FilesResponse> {
    let files = state.list_files();
    let count = files.len();

    Json(FilesResponse { files, count })
}

/// POST /api/reindex - Index files that have no index yet
pub async fn reindex<E: Embedder, G: Generator>(
    State(state): State<Arc<AppState<E, G>>>,
) -> Json<PipelineReport> {
    Json(state.reindex().await)
}

/// GET /health - Health check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
