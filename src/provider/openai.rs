use super::{ChatMessage, ChatModel, EmbeddingProvider};
use crate::error::{EmbeddingError, ModelError};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const EMBEDDINGS_ENDPOINT: &str = "https://api.openai.com/v1/embeddings";

/// OpenAI chat completion backend
pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiChat {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ModelError::RequestFailed(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[async_trait::async_trait]
impl ChatModel for OpenAiChat {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ModelError> {
        let request = ChatRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
        };

        tracing::debug!("OpenAI chat request with {} messages", messages.len());

        let response = self
            .client
            .post(CHAT_ENDPOINT)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::RequestFailed(e.to_string()))?;

        let body: ChatResponse = check_model_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.is_empty() {
            return Err(ModelError::EmptyResponse);
        }

        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// OpenAI embedding backend
pub struct OpenAiEmbeddings {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiEmbeddings {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, EmbeddingError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                EmbeddingError::RequestFailed(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        tracing::debug!("Generating embeddings for {} texts", texts.len());

        let request = EmbeddingRequest {
            model: &self.model,
            input: &texts,
        };

        let response = self
            .client
            .post(EMBEDDINGS_ENDPOINT)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbeddingError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(EmbeddingError::InvalidCredentials);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(EmbeddingError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::RequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let mut body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        // Result order in the array is not guaranteed; `index` is.
        body.data.sort_by_key(|item| item.index);

        if body.data.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: body.data.len(),
            });
        }

        Ok(body.data.into_iter().map(|item| item.embedding).collect())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Map an HTTP error status to a model error, passing successes through
async fn check_model_status(response: reqwest::Response) -> Result<reqwest::Response, ModelError> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ModelError::InvalidCredentials);
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ModelError::RateLimited);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ModelError::RequestFailed(format!("HTTP {}: {}", status, body)));
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_wire_format() {
        let messages = vec![
            ChatMessage::system("sys"),
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
        ];
        let request = ChatRequest {
            model: "gpt-4",
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert_eq!(json["messages"][2]["role"], "assistant");
    }

    #[test]
    fn test_chat_response_parsing() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"The answer."}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("The answer.")
        );
    }

    #[test]
    fn test_embedding_response_parsing_restores_order() {
        let raw = r#"{"data":[
            {"index":1,"embedding":[0.5,0.6]},
            {"index":0,"embedding":[0.1,0.2]}
        ]}"#;
        let mut parsed: EmbeddingResponse = serde_json::from_str(raw).unwrap();
        parsed.data.sort_by_key(|item| item.index);
        assert_eq!(parsed.data[0].embedding, vec![0.1, 0.2]);
        assert_eq!(parsed.data[1].embedding, vec![0.5, 0.6]);
    }

    #[test]
    fn test_constructors() {
        let chat = OpenAiChat::new("sk-test", "gpt-4", 30).unwrap();
        assert_eq!(chat.model_name(), "gpt-4");

        let embeddings = OpenAiEmbeddings::new("sk-test", "text-embedding-3-small", 30).unwrap();
        assert_eq!(embeddings.model_name(), "text-embedding-3-small");
    }

    #[tokio::test]
    async fn test_empty_embedding_batch_is_a_noop() {
        let embeddings = OpenAiEmbeddings::new("sk-test", "text-embedding-3-small", 30).unwrap();
        let result = embeddings.embed_batch(vec![]).await.unwrap();
        assert!(result.is_empty());
    }
}
