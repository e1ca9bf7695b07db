use askama::Template;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use doc_indexer::FileOutcome;
use docqa_store::Embedder;
use std::sync::Arc;

use super::dto::{self, FileEntry, SourceInfo};
use super::error::ApiError;
use super::handlers::validate;
use super::state::AppState;
use crate::engine::{Generator, session};

/// Helper to render templates into axum responses
fn render_template<T: Template>(template: &T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template render error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Template error: {}", e),
            )
                .into_response()
        }
    }
}

/// GET / - Main chat page
#[derive(Template)]
#[template(path = "chat.html")]
pub struct ChatPage {
    pub files: Vec<FileEntry>,
    pub oob: bool,
}

pub async fn index<E: Embedder, G: Generator>(State(state): State<Arc<AppState<E, G>>>) -> Response {
    render_template(&ChatPage {
        files: state.list_files(),
        oob: false,
    })
}

/// POST /ask - Question form submission (returns HTML fragment)
#[derive(serde::Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub question: String,
}

#[derive(Template)]
#[template(path = "partials/answer.html")]
pub struct AnswerFragment {
    pub file: String,
    pub question: String,
    pub answer: String,
    pub sources: Vec<SourceInfo>,
}

/// Shown in place of an answer; the page stays usable
#[derive(Template)]
#[template(path = "partials/error.html")]
pub struct ErrorFragment {
    pub question: String,
    pub message: String,
}

pub async fn ask_html<E: Embedder, G: Generator>(
    State(state): State<Arc<AppState<E, G>>>,
    Form(form): Form<AskForm>,
) -> Response {
    let (file, question) = match validate(&form.file, &form.question) {
        Ok(v) => v,
        Err(e) => return error_fragment(form.question.trim(), &e),
    };

    match session::ask(
        question,
        file,
        &state.embedder,
        &state.llm,
        &state.store,
        &state.retrieval,
    )
    .await
    {
        Ok(answer) => render_template(&AnswerFragment {
            file: answer.file_name,
            question: question.to_string(),
            answer: answer.answer,
            sources: dto::build_sources(&answer.sources),
        }),
        Err(e) => {
            tracing::error!(file = %file, error = %e, "question failed");
            error_fragment(question, &ApiError::from(e))
        }
    }
}

fn error_fragment(question: &str, err: &ApiError) -> Response {
    render_template(&ErrorFragment {
        question: question.to_string(),
        message: err.message().to_string(),
    })
}

/// POST /reindex - Indexing pass summary, plus a refreshed file picker
#[derive(Template)]
#[template(path = "partials/reindex.html")]
pub struct ReindexFragment {
    pub rows: Vec<ReindexRow>,
    pub indexed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub files: Vec<FileEntry>,
    /// Swap the file picker out-of-band
    pub oob: bool,
}

pub struct ReindexRow {
    pub file_name: String,
    pub outcome: &'static str,
    pub detail: String,
}

pub async fn reindex_html<E: Embedder, G: Generator>(
    State(state): State<Arc<AppState<E, G>>>,
) -> Response {
    let report = state.reindex().await;

    let rows = report
        .files
        .iter()
        .map(|f| {
            let (outcome, detail) = match &f.outcome {
                FileOutcome::Skipped => ("skipped", "already indexed".to_string()),
                FileOutcome::Indexed { chunks } => ("indexed", format!("{chunks} chunks")),
                FileOutcome::Failed { error } => ("failed", error.clone()),
            };
            ReindexRow {
                file_name: f.file_name.clone(),
                outcome,
                detail,
            }
        })
        .collect();

    render_template(&ReindexFragment {
        rows,
        indexed: report.indexed(),
        skipped: report.skipped(),
        failed: report.failed(),
        files: state.list_files(),
        oob: true,
    })
}
