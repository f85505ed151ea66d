use crate::{config::Inference, log_internal};
use anyhow::{anyhow, Result};
use std::{sync::Arc, time::Duration};

/// Something that turns a fully assembled prompt into generated text.
#[serenity::async_trait]
pub trait InferenceGateway: Send + Sync {
    async fn generate(&self, prompt: String) -> Result<String>;
}

/// Completion endpoint of a local Ollama-style server
pub struct HttpInference {
    client: reqwest::Client,
    settings: Inference,
}

#[derive(serde::Serialize)]
struct CompletionRequest<'a> {
    /// LLM model name
    model: &'a str,
    /// Text to complete
    prompt: &'a str,
    /// Whether to stream one token at a time, or return entire response is one go
    stream: bool,
    options: CompletionOptions,
}

#[derive(serde::Serialize)]
struct CompletionOptions {
    temperature: f32,
    /// Maximum number of tokens to generate
    num_predict: usize,
}

#[derive(serde::Deserialize)]
struct CompletionResponse {
    response: String,
}

impl HttpInference {
    pub fn new(settings: Inference) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    fn request<'a>(&'a self, prompt: &'a str) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.settings.model_name,
            prompt,
            stream: false,
            options: CompletionOptions {
                temperature: self.settings.temperature,
                num_predict: self.settings.max_new_tokens,
            },
        }
    }
}

#[serenity::async_trait]
impl InferenceGateway for HttpInference {
    async fn generate(&self, prompt: String) -> Result<String> {
        let url = self.settings.completion_url.as_str();

        log_internal!("Sending request to completion endpoint {}... ", url);
        let response = self
            .client
            .post(url)
            .json(&self.request(&prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Ollama reports failures as `{"error": "..."}`
            let body = response.json::<serde_json::Value>().await.unwrap_or_default();
            let reason = body
                .get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("<no error message>");
            return Err(anyhow!("Completion endpoint returned {}: {}", status, reason));
        }

        let response = response.json::<CompletionResponse>().await?;
        log_internal!("Sending request to completion endpoint {}... done", url);

        Ok(response.response)
    }
}

/// Run a generation on its own task so a slow model can't hold up other interactions.  The task
/// is aborted if it outlives `limit`.
pub async fn generate_detached(
    gateway: Arc<dyn InferenceGateway>,
    prompt: String,
    limit: Duration,
) -> Result<String> {
    let mut task = tokio::spawn(async move { gateway.generate(prompt).await });

    match tokio::time::timeout(limit, &mut task).await {
        Ok(joined) => joined.map_err(|e| anyhow!("Inference task failed: {}", e))?,
        Err(_) => {
            task.abort();
            Err(anyhow!(
                "Inference did not finish within {} seconds",
                limit.as_secs()
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[serenity::async_trait]
    impl InferenceGateway for Echo {
        async fn generate(&self, prompt: String) -> Result<String> {
            Ok(prompt)
        }
    }

    struct Stalled;

    #[serenity::async_trait]
    impl InferenceGateway for Stalled {
        async fn generate(&self, _prompt: String) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(String::new())
        }
    }

    struct Broken;

    #[serenity::async_trait]
    impl InferenceGateway for Broken {
        async fn generate(&self, _prompt: String) -> Result<String> {
            Err(anyhow!("model not loaded"))
        }
    }

    #[tokio::test]
    async fn detached_generation_returns_result() {
        let out = generate_detached(Arc::new(Echo), "hi".to_owned(), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(out, "hi");
    }

    #[tokio::test]
    async fn detached_generation_times_out() {
        let err = generate_detached(Arc::new(Stalled), "hi".to_owned(), Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("did not finish"));
    }

    #[tokio::test]
    async fn detached_generation_propagates_failure() {
        let err = generate_detached(Arc::new(Broken), "hi".to_owned(), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "model not loaded");
    }

    #[test]
    fn request_shape() {
        let gateway = HttpInference::new(Inference {
            completion_url: "http://localhost:11434/api/generate".to_owned(),
            model_name: "dolphin".to_owned(),
            max_new_tokens: 200,
            temperature: 0.5,
            timeout_seconds: 10,
        });

        let body = serde_json::to_value(gateway.request("Bonjour")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "model": "dolphin",
                "prompt": "Bonjour",
                "stream": false,
                "options": { "temperature": 0.5, "num_predict": 200 },
            })
        );
    }
}
