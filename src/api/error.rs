use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use docqa_store::IndexError;
use serde::Serialize;

use crate::engine::EngineError;

/// API-layer error type
#[derive(Debug)]
pub enum ApiError {
    /// 400 - Bad request (invalid input)
    BadRequest(String),

    /// 404 - Selected file has no index
    NotFound(String),

    /// 502 - Embedding or chat service failed
    BadGateway(String),

    /// 500 - Internal error
    Internal(String),
}

impl ApiError {
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::BadGateway(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "upstream_error", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = ErrorBody {
            error: error_type.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Index(IndexError::NotFound(file)) => {
                ApiError::NotFound(format!("{file} has not been indexed yet. Reindex first."))
            }
            EngineError::Index(e @ IndexError::ModelMismatch { .. }) => {
                ApiError::Internal(format!("{e}. Delete the index and reindex the file."))
            }
            EngineError::Index(e) => ApiError::Internal(e.to_string()),
            EngineError::Embedding(e) => ApiError::BadGateway(format!("Embedding error: {e}")),
            EngineError::Generation(e) => ApiError::BadGateway(format!("LLM error: {e}")),
        }
    }
}
