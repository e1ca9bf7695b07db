use super::EngineError;
use rig::providers::gemini;
use std::future::Future;

/// Hosted chat model turning a prompt into answer text
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, EngineError>> + Send;
}

/// Wrapper around the LLM client
pub struct LlmClient {
    client: gemini::Client,
    model: String,
}

impl LlmClient {
    /// Create client from an explicit API key
    pub fn new(api_key: &str, model: impl Into<String>) -> Self {
        Self {
            client: gemini::Client::new(api_key),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Generator for LlmClient {
    /// Generate a response from the LLM
    async fn generate(&self, prompt: &str) -> Result<String, EngineError> {
        use rig::client::CompletionClient;
        use rig::completion::Prompt;

        let agent = self.client.agent(&self.model).build();

        agent
            .prompt(prompt)
            .await
            .map_err(|e| EngineError::Generation(e.to_string()))
    }
}
