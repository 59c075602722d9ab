/// Centralized error types for document-rag using thiserror
///
/// Provides domain-specific error types for better error handling and user-facing messages.
use thiserror::Error;

/// Main error type for the document QA core
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors related to PDF text extraction
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Input is not a valid PDF: {0}")]
    InvalidPdf(String),

    #[error("PDF contains no extractable text layer")]
    NoTextLayer,
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

/// Errors related to embedding generation through a remote provider
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Embedding request failed: {0}")]
    RequestFailed(String),

    #[error("Embedding provider rejected the credentials")]
    InvalidCredentials,

    #[error("Embedding provider rate limit exceeded")]
    RateLimited,

    #[error("Embedding count mismatch: expected {expected}, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Failed to parse embedding response: {0}")]
    InvalidResponse(String),
}

/// Errors related to language model invocation
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model request failed: {0}")]
    RequestFailed(String),

    #[error("Model provider rejected the credentials")]
    InvalidCredentials,

    #[error("Model provider rate limit exceeded")]
    RateLimited,

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Failed to parse model response: {0}")]
    InvalidResponse(String),
}

/// Errors related to retrieval from the vector index
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("No vector index has been built for this document")]
    IndexNotBuilt,
}

// Conversion from anyhow::Error to RagError
impl From<anyhow::Error> for RagError {
    fn from(err: anyhow::Error) -> Self {
        RagError::Other(format!("{:#}", err))
    }
}

// Helper methods for RagError
impl RagError {
    /// Create a new error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        RagError::Other(msg.into())
    }

    /// Convert to a user-facing error string suitable for the presentation shell
    pub fn to_user_string(&self) -> String {
        format!("{}", self)
    }

    /// Check if this is a caller error (bad parameters, missing index) vs a provider failure
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            RagError::Config(_) | RagError::Retrieval(_) | RagError::EmptyInput(_)
        )
    }
}
