/// Chunks stuffed into each prompt unless configured otherwise
pub const DEFAULT_TOP_K: usize = 4;

pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.0-flash";

/// How many chunks to retrieve
#[derive(Clone, Debug)]
pub struct RetrievalConfig {
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}
