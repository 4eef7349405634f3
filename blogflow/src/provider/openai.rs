//! OpenAI-compatible chat-completions provider.

use super::{FragmentStream, SseDecoder, SseEvent, TextGenerator};
use crate::config::LlmConfig;
use crate::errors::GenerationError;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Text generator backed by an OpenAI-compatible HTTP API.
///
/// Streaming responses deliver incremental deltas.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    client: Client,
    config: LlmConfig,
}

impl OpenAiGenerator {
    /// Creates a generator from configuration.
    pub fn new(config: LlmConfig) -> Result<Self, GenerationError> {
        if config.api_key.trim().is_empty() {
            return Err(GenerationError::NotConfigured(
                "no API key configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GenerationError::NotConfigured(e.to_string()))?;

        tracing::info!(model = %config.model, "OpenAI generator initialized");

        Ok(Self { client, config })
    }

    /// Returns the configuration in use.
    #[must_use]
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn request<'a>(&'a self, prompt: &'a str, stream: bool) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stream,
        }
    }

    async fn send(&self, body: &ChatRequest<'_>) -> Result<reqwest::Response, GenerationError> {
        tracing::debug!(
            model = body.model,
            stream = body.stream,
            prompt_chars = body.messages.iter().map(|m| m.content.len()).sum::<usize>(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status.as_u16() == 429 {
            return Err(GenerationError::RateLimited);
        }

        let message = response.text().await.unwrap_or_default();
        Err(GenerationError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let response = self.send(&self.request(prompt, false)).await?;
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Parse(e.to_string()))?;

        if let Some(usage) = &body.usage {
            tracing::debug!(
                input_tokens = usage.prompt_tokens,
                output_tokens = usage.completion_tokens,
                "Chat completion finished"
            );
        }

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::Parse("response contained no choices".to_string()))
    }

    async fn generate_streaming(&self, prompt: &str) -> Result<FragmentStream, GenerationError> {
        let response = self.send(&self.request(prompt, true)).await?;
        let mut bytes = response.bytes_stream();

        let stream = async_stream::stream! {
            let mut decoder = SseDecoder::new();

            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(GenerationError::from(e));
                        return;
                    }
                };

                for event in decoder.feed(&chunk) {
                    match event {
                        Ok(SseEvent::Delta(text)) if text.is_empty() => {}
                        Ok(SseEvent::Delta(text)) => yield Ok(text),
                        Ok(SseEvent::Done) => return,
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    }
                }
            }

            for event in decoder.finish() {
                match event {
                    Ok(SseEvent::Delta(text)) if !text.is_empty() => yield Ok(text),
                    Ok(_) => {}
                    Err(e) => yield Err(e),
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_api_key() {
        let err = OpenAiGenerator::new(LlmConfig::default()).unwrap_err();
        assert!(matches!(err, GenerationError::NotConfigured(_)));
    }

    #[test]
    fn test_request_body_shape() {
        let generator = OpenAiGenerator::new(
            LlmConfig::new("sk-test").with_model("gpt-4o-mini").with_temperature(0.5),
        )
        .unwrap();

        let body = serde_json::to_value(generator.request("Topic: rust", true)).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["stream"], true);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Topic: rust");
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_response_parsing() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Hi"}}],"usage":{"prompt_tokens":3,"completion_tokens":1}}"#,
        )
        .unwrap();
        assert_eq!(body.choices[0].message.content.as_deref(), Some("Hi"));
        assert_eq!(body.usage.unwrap().completion_tokens, 1);
    }
}
