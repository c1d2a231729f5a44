pub mod gemini;
pub mod ollama;

use async_trait::async_trait;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
