/// Configuration system for document-rag
///
/// Supports loading from multiple sources with priority:
/// Environment variables > Config file > Defaults
use crate::error::{ConfigError, RagError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Model and embedding provider configuration
    pub provider: ProviderConfig,

    /// Text chunking configuration
    pub chunking: ChunkingConfig,

    /// Retrieval configuration
    pub retrieval: RetrievalConfig,

    /// Theme extraction configuration
    pub themes: ThemesConfig,

    /// Learning session configuration
    pub session: SessionConfig,
}

/// Model and embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Chat backend: "openai" or "gemini"
    #[serde(default = "default_backend")]
    pub backend: String,

    /// API key for OpenAI (chat and embeddings)
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// API key for Gemini
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Chat model identifier (e.g., "gpt-4", "gemini-1.5-flash")
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Embedding model identifier
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters of context shared between consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// Theme extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemesConfig {
    /// Number of leading chunks sampled for theme extraction
    #[serde(default = "default_sample_chunks")]
    pub sample_chunks: usize,

    /// Maximum number of theme labels requested
    #[serde(default = "default_max_themes")]
    pub max_themes: usize,
}

/// Learning session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Minimum session duration in minutes
    #[serde(default = "default_min_duration")]
    pub min_duration_minutes: u32,

    /// Maximum session duration in minutes
    #[serde(default = "default_max_duration")]
    pub max_duration_minutes: u32,
}

// Default value functions
fn default_backend() -> String {
    "openai".to_string()
}

fn default_chat_model() -> String {
    "gpt-4".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_request_timeout() -> u64 {
    60
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_top_k() -> usize {
    4
}

fn default_sample_chunks() -> usize {
    5
}

fn default_max_themes() -> usize {
    5
}

fn default_min_duration() -> u32 {
    10
}

fn default_max_duration() -> u32 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            openai_api_key: None,
            gemini_api_key: None,
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
            timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

impl Default for ThemesConfig {
    fn default() -> Self {
        Self {
            sample_chunks: default_sample_chunks(),
            max_themes: default_max_themes(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_duration_minutes: default_min_duration(),
            max_duration_minutes: default_max_duration(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self, RagError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed(format!("Invalid TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default location or create default
    pub fn load_or_default() -> Result<Self, RagError> {
        let config_path = crate::paths::PlatformPaths::default_config_path();

        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            Self::from_file(&config_path)
        } else {
            tracing::info!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), RagError> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::SaveFailed(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), RagError> {
        // Validate chat backend
        if self.provider.backend != "openai" && self.provider.backend != "gemini" {
            return Err(ConfigError::InvalidValue {
                key: "provider.backend".to_string(),
                reason: format!(
                    "must be 'openai' or 'gemini', got '{}'",
                    self.provider.backend
                ),
            }
            .into());
        }

        // Validate chunk size
        if self.chunking.chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "chunking.chunk_size".to_string(),
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        // Validate overlap against chunk size
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(ConfigError::InvalidValue {
                key: "chunking.chunk_overlap".to_string(),
                reason: format!(
                    "must be smaller than chunk_size ({} >= {})",
                    self.chunking.chunk_overlap, self.chunking.chunk_size
                ),
            }
            .into());
        }

        // Validate top_k
        if self.retrieval.top_k == 0 {
            return Err(ConfigError::InvalidValue {
                key: "retrieval.top_k".to_string(),
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        // Validate theme limits
        if self.themes.max_themes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "themes.max_themes".to_string(),
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.themes.sample_chunks == 0 {
            return Err(ConfigError::InvalidValue {
                key: "themes.sample_chunks".to_string(),
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        // Validate session duration bounds
        if self.session.min_duration_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "session.min_duration_minutes".to_string(),
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.session.max_duration_minutes < self.session.min_duration_minutes {
            return Err(ConfigError::InvalidValue {
                key: "session.max_duration_minutes".to_string(),
                reason: format!(
                    "must be at least min_duration_minutes ({} < {})",
                    self.session.max_duration_minutes, self.session.min_duration_minutes
                ),
            }
            .into());
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        // Chat backend
        if let Ok(backend) = std::env::var("DOCUMENT_RAG_BACKEND") {
            self.provider.backend = backend;
        }

        // API keys
        if let Ok(key) = std::env::var("DOCUMENT_RAG_OPENAI_API_KEY") {
            self.provider.openai_api_key = Some(key);
        }

        if let Ok(key) = std::env::var("DOCUMENT_RAG_GEMINI_API_KEY") {
            self.provider.gemini_api_key = Some(key);
        }

        // Chat model
        if let Ok(model) = std::env::var("DOCUMENT_RAG_CHAT_MODEL") {
            self.provider.chat_model = model;
        }

        // Embedding model
        if let Ok(model) = std::env::var("DOCUMENT_RAG_EMBEDDING_MODEL") {
            self.provider.embedding_model = model;
        }

        // Chunk size
        if let Ok(chunk_size) = std::env::var("DOCUMENT_RAG_CHUNK_SIZE")
            && let Ok(size) = chunk_size.parse()
        {
            self.chunking.chunk_size = size;
        }

        // Chunk overlap
        if let Ok(overlap) = std::env::var("DOCUMENT_RAG_CHUNK_OVERLAP")
            && let Ok(overlap) = overlap.parse()
        {
            self.chunking.chunk_overlap = overlap;
        }

        // Retrieval depth
        if let Ok(top_k) = std::env::var("DOCUMENT_RAG_TOP_K")
            && let Ok(k) = top_k.parse()
        {
            self.retrieval.top_k = k;
        }
    }

    /// Create a new Config with defaults and environment overrides
    pub fn new() -> Result<Self, RagError> {
        let mut config = Self::load_or_default()?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.themes.max_themes, 5);
    }

    #[test]
    fn test_invalid_backend_rejected() {
        let mut config = Config::default();
        config.provider.backend = "palm".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overlap_must_be_below_chunk_size() {
        let mut config = Config::default();
        config.chunking.chunk_size = 100;
        config.chunking.chunk_overlap = 100;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("chunking.chunk_overlap"));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let mut config = Config::default();
        config.chunking.chunk_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duration_bounds_ordering() {
        let mut config = Config::default();
        config.session.min_duration_minutes = 60;
        config.session.max_duration_minutes = 30;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("session.max_duration_minutes"));
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.provider.backend = "gemini".to_string();
        config.chunking.chunk_size = 800;
        config.save(&path).unwrap();

        let reloaded = Config::from_file(&path).unwrap();
        assert_eq!(reloaded.provider.backend, "gemini");
        assert_eq!(reloaded.chunking.chunk_size, 800);
        assert_eq!(reloaded.chunking.chunk_overlap, 200);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.toml");
        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(
            err,
            RagError::Config(ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chunking]\nchunk_size = 500\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.provider.backend, "openai");
    }
}
