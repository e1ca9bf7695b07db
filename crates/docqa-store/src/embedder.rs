use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

/// Gemini REST endpoint root.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Embedding model used when none is configured.
pub const DEFAULT_EMBEDDING_MODEL: &str = "models/embedding-001";

/// Upper bound on texts per `batchEmbedContents` request.
const MAX_BATCH_SIZE: usize = 100;

#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("embedder misconfigured: {0}")]
    Config(String),

    #[error("network error talking to embedding service: {0}")]
    Network(#[from] reqwest::Error),

    #[error("embedding service rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("embedding service rejected credentials: {0}")]
    Auth(String),

    #[error("embedding service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed embedding response: {0}")]
    Malformed(String),
}

/// Maps chunk text to fixed-dimension vectors.
///
/// Output order always matches input order.
pub trait Embedder: Send + Sync {
    /// Model identifier recorded in persisted indexes.
    fn model_id(&self) -> &str;

    /// Embed texts that will be stored in an index.
    fn embed_documents(
        &self,
        texts: &[&str],
    ) -> impl Future<Output = Result<Vec<Vec<f32>>, EmbedError>> + Send;

    /// Embed a question used to search an index.
    fn embed_query(&self, text: &str) -> impl Future<Output = Result<Vec<f32>, EmbedError>> + Send;
}

/// Connection settings for [`GeminiEmbedder`]. The credential is passed in, never read from the environment here.
#[derive(Clone, Debug)]
pub struct EmbedderConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

impl EmbedderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_EMBEDDING_MODEL.into(),
            api_base: DEFAULT_API_BASE.into(),
        }
    }
}

/// Hosted embedder talking to the Gemini `batchEmbedContents` API.
pub struct GeminiEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiEmbedder {
    pub fn new(config: EmbedderConfig) -> Result<Self, EmbedError> {
        if config.api_key.trim().is_empty() {
            return Err(EmbedError::Config("missing API key".into()));
        }
        if config.model.trim().is_empty() {
            return Err(EmbedError::Config("missing embedding model name".into()));
        }

        let model = qualified_model_name(config.model.trim());
        let endpoint = format!(
            "{}/{}:batchEmbedContents",
            config.api_base.trim_end_matches('/'),
            model
        );

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            model,
            api_key: config.api_key.trim().to_string(),
        })
    }

    async fn embed_with_task(
        &self,
        texts: &[&str],
        task: TaskType,
    ) -> Result<Vec<Vec<f32>>, EmbedError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_BATCH_SIZE) {
            tracing::debug!(model = %self.model, batch = batch.len(), "embedding batch");
            vectors.extend(self.send_batch(batch, task).await?);
        }
        Ok(vectors)
    }

    async fn send_batch(&self, batch: &[&str], task: TaskType) -> Result<Vec<Vec<f32>>, EmbedError> {
        let request = BatchEmbedRequest {
            requests: batch
                .iter()
                .map(|&text| EmbedContentRequest {
                    model: &self.model,
                    content: Content {
                        parts: vec![Part { text }],
                    },
                    task_type: task,
                })
                .collect(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(classify_status(status, body));
        }

        let parsed: BatchEmbedResponse = response
            .json()
            .await
            .map_err(|e| EmbedError::Malformed(e.to_string()))?;
        check_vectors(parsed, batch.len())
    }
}

impl Embedder for GeminiEmbedder {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.embed_with_task(texts, TaskType::RetrievalDocument).await
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        self.embed_with_task(&[text], TaskType::RetrievalQuery)
            .await?
            .pop()
            .ok_or_else(|| EmbedError::Malformed("no embedding returned for query".into()))
    }
}

/// `embedding-001` → `models/embedding-001`
fn qualified_model_name(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

fn classify_status(status: StatusCode, body: String) -> EmbedError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => EmbedError::RateLimited(body),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => EmbedError::Auth(body),
        // Gemini reports an invalid key as 400 INVALID_ARGUMENT
        StatusCode::BAD_REQUEST if body.contains("API_KEY_INVALID") => EmbedError::Auth(body),
        _ => EmbedError::Api {
            status: status.as_u16(),
            body,
        },
    }
}

fn check_vectors(response: BatchEmbedResponse, expected: usize) -> Result<Vec<Vec<f32>>, EmbedError> {
    if response.embeddings.len() != expected {
        return Err(EmbedError::Malformed(format!(
            "{} embeddings returned for {} inputs",
            response.embeddings.len(),
            expected
        )));
    }

    let vectors: Vec<Vec<f32>> = response.embeddings.into_iter().map(|e| e.values).collect();
    if let Some(first) = vectors.first() {
        let dimension = first.len();
        if dimension == 0 || vectors.iter().any(|v| v.len() != dimension) {
            return Err(EmbedError::Malformed("inconsistent embedding dimensions".into()));
        }
    }
    Ok(vectors)
}

#[derive(Serialize, Clone, Copy, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum TaskType {
    RetrievalDocument,
    RetrievalQuery,
}

#[derive(Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content<'a>,
    task_type: TaskType,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}
