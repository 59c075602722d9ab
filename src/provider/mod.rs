mod gemini;
mod openai;

pub use gemini::GeminiChat;
pub use openai::{OpenAiChat, OpenAiEmbeddings};

use crate::config::ProviderConfig;
use crate::error::{ConfigError, EmbeddingError, ModelError, RagError};
use std::sync::Arc;

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message in a model conversation
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Trait for language model completion
///
/// Both commercial backends conform to this one interface; callers never
/// branch on which provider is behind it.
#[async_trait::async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one completion over an ordered message list
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ModelError>;

    /// Get the model identifier
    fn model_name(&self) -> &str;
}

impl std::fmt::Debug for dyn ChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatModel")
            .field("model_name", &self.model_name())
            .finish_non_exhaustive()
    }
}

/// Trait for embedding generation
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for a batch of texts, order preserved
    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Get the model identifier
    fn model_name(&self) -> &str;
}

impl std::fmt::Debug for dyn EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingProvider")
            .field("model_name", &self.model_name())
            .finish_non_exhaustive()
    }
}

/// Selectable chat backend, resolved once at construction time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelBackend {
    OpenAi,
    Gemini,
}

impl ModelBackend {
    /// Parse a backend name from configuration
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name {
            "openai" => Ok(ModelBackend::OpenAi),
            "gemini" => Ok(ModelBackend::Gemini),
            other => Err(ConfigError::InvalidValue {
                key: "provider.backend".to_string(),
                reason: format!("must be 'openai' or 'gemini', got '{}'", other),
            }),
        }
    }
}

/// Build the configured chat model
pub fn chat_model_from_config(config: &ProviderConfig) -> Result<Arc<dyn ChatModel>, RagError> {
    let backend = ModelBackend::parse(&config.backend)?;

    match backend {
        ModelBackend::OpenAi => {
            let api_key = config.openai_api_key.clone().ok_or_else(|| {
                ConfigError::MissingRequired("provider.openai_api_key".to_string())
            })?;
            let chat = OpenAiChat::new(api_key, &config.chat_model, config.timeout_secs)?;
            Ok(Arc::new(chat))
        }
        ModelBackend::Gemini => {
            let api_key = config.gemini_api_key.clone().ok_or_else(|| {
                ConfigError::MissingRequired("provider.gemini_api_key".to_string())
            })?;
            let chat = GeminiChat::new(api_key, &config.chat_model, config.timeout_secs)?;
            Ok(Arc::new(chat))
        }
    }
}

/// Build the configured embedding provider
///
/// Embeddings always go through OpenAI regardless of the chat backend,
/// matching the behavior of the original system. A different provider can
/// be injected through the trait seam.
pub fn embedding_provider_from_config(
    config: &ProviderConfig,
) -> Result<Arc<dyn EmbeddingProvider>, RagError> {
    let api_key = config
        .openai_api_key
        .clone()
        .ok_or_else(|| ConfigError::MissingRequired("provider.openai_api_key".to_string()))?;

    let embeddings = OpenAiEmbeddings::new(api_key, &config.embedding_model, config.timeout_secs)?;
    Ok(Arc::new(embeddings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(Role::System.as_str(), "system");
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }

    #[test]
    fn test_message_constructors() {
        let msg = ChatMessage::system("be helpful");
        assert_eq!(msg.role, Role::System);
        assert_eq!(msg.content, "be helpful");

        assert_eq!(ChatMessage::user("q").role, Role::User);
        assert_eq!(ChatMessage::assistant("a").role, Role::Assistant);
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!(ModelBackend::parse("openai").unwrap(), ModelBackend::OpenAi);
        assert_eq!(ModelBackend::parse("gemini").unwrap(), ModelBackend::Gemini);
        assert!(ModelBackend::parse("palm").is_err());
    }

    #[test]
    fn test_chat_model_requires_matching_key() {
        let config = ProviderConfig {
            backend: "gemini".to_string(),
            openai_api_key: Some("sk-test".to_string()),
            gemini_api_key: None,
            ..ProviderConfig::default()
        };
        let err = chat_model_from_config(&config).unwrap_err();
        assert!(err.to_string().contains("provider.gemini_api_key"));
    }

    #[test]
    fn test_embedding_provider_requires_openai_key() {
        let config = ProviderConfig {
            backend: "gemini".to_string(),
            openai_api_key: None,
            gemini_api_key: Some("g-test".to_string()),
            ..ProviderConfig::default()
        };
        let err = embedding_provider_from_config(&config).unwrap_err();
        assert!(err.to_string().contains("provider.openai_api_key"));
    }

    #[test]
    fn test_chat_model_construction_with_key() {
        let config = ProviderConfig {
            backend: "openai".to_string(),
            openai_api_key: Some("sk-test".to_string()),
            ..ProviderConfig::default()
        };
        let model = chat_model_from_config(&config).unwrap();
        assert_eq!(model.model_name(), "gpt-4");
    }
}
