//! Per-document session orchestration
//!
//! This module provides the main entry point for using document-rag as a
//! library: one [`DocumentSession`] per document, owning that document's
//! vector index and conversation memory.

use crate::chunker::{Chunk, TextChunker};
use crate::config::Config;
use crate::error::{RagError, RetrievalError};
use crate::extractor;
use crate::index::VectorIndex;
use crate::memory::ConversationMemory;
use crate::provider::{
    chat_model_from_config, embedding_provider_from_config, ChatModel, EmbeddingProvider,
};
use crate::{qa, session_plan, themes};
use std::sync::Arc;

/// Lifecycle of one document inside a session
///
/// `load_document` walks Uploaded → Extracted → Chunked → Indexed → Ready.
/// From `Ready`, question answering and session generation are available
/// repeatedly and independently; neither changes the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uploaded,
    Extracted,
    Chunked,
    Indexed,
    Ready,
}

/// What `load_document` produced
#[derive(Debug, Clone)]
pub struct DocumentSummary {
    /// Characters of extracted text
    pub characters: usize,
    /// Number of chunks indexed
    pub chunks: usize,
}

/// One document's QA session
///
/// Owns the vector index and the conversation memory for exactly one
/// document, so concurrent sessions over different documents cannot
/// interfere with each other. Memory-mutating calls take `&mut self`;
/// the index itself is immutable once built and cheap to share.
///
/// # Example
///
/// ```no_run
/// use document_rag::{Config, DocumentSession};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let session_config = Config::new()?;
///     let mut session = DocumentSession::with_config(session_config)?;
///
///     let bytes = std::fs::read("handbook.pdf")?;
///     let summary = session.load_document(&bytes).await?;
///     println!("indexed {} chunks", summary.chunks);
///
///     let themes = session.extract_themes().await?;
///     let plan = session.generate_session_plan(&themes[0], 30).await?;
///     println!("{plan}");
///
///     let answer = session.ask("What does chapter two cover?").await?;
///     println!("{answer}");
///     Ok(())
/// }
/// ```
pub struct DocumentSession {
    config: Arc<Config>,
    chat: Arc<dyn ChatModel>,
    embedder: Arc<dyn EmbeddingProvider>,
    chunker: TextChunker,
    chunks: Vec<Chunk>,
    index: Option<Arc<VectorIndex>>,
    memory: ConversationMemory,
    state: SessionState,
}

impl std::fmt::Debug for DocumentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSession")
            .field("chunks", &self.chunks.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl DocumentSession {
    /// Create a session from the default configuration sources
    pub fn new() -> Result<Self, RagError> {
        let config = Config::new()?;
        Self::with_config(config)
    }

    /// Create a session with custom configuration
    ///
    /// The chat backend is selected here, once, from
    /// `config.provider.backend`; call sites never branch on the provider
    /// again.
    pub fn with_config(config: Config) -> Result<Self, RagError> {
        config.validate()?;

        tracing::info!("Initializing document session");
        tracing::debug!("Chat backend: {}", config.provider.backend);
        tracing::debug!("Chat model: {}", config.provider.chat_model);
        tracing::debug!(
            "Chunking: size {}, overlap {}",
            config.chunking.chunk_size,
            config.chunking.chunk_overlap
        );

        let chat = chat_model_from_config(&config.provider)?;
        let embedder = embedding_provider_from_config(&config.provider)?;

        Self::with_providers(config, chat, embedder)
    }

    /// Create a session with injected providers
    ///
    /// Used by tests and by callers that bring their own model or
    /// embedding implementation.
    pub fn with_providers(
        config: Config,
        chat: Arc<dyn ChatModel>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, RagError> {
        config.validate()?;
        let chunker = TextChunker::from_config(&config.chunking)?;

        Ok(Self {
            config: Arc::new(config),
            chat,
            embedder,
            chunker,
            chunks: Vec::new(),
            index: None,
            memory: ConversationMemory::new(),
            state: SessionState::Uploaded,
        })
    }

    /// Extract, chunk and index a PDF, replacing any previous document
    ///
    /// Conversation memory deliberately survives a reload; call
    /// [`clear_memory`](Self::clear_memory) to start the conversation over.
    pub async fn load_document(&mut self, bytes: &[u8]) -> Result<DocumentSummary, RagError> {
        self.state = SessionState::Uploaded;
        self.index = None;
        self.chunks.clear();

        let text = extractor::extract_text(bytes)?;
        self.load_text(&text).await
    }

    /// Chunk and index already-extracted document text
    ///
    /// For callers that extract text themselves, or hold it in a format
    /// other than PDF. Same semantics as [`load_document`](Self::load_document)
    /// from the Extracted state onward.
    pub async fn load_text(&mut self, text: &str) -> Result<DocumentSummary, RagError> {
        self.index = None;
        self.chunks.clear();
        self.state = SessionState::Extracted;

        let chunks = self.chunker.split(text);
        self.state = SessionState::Chunked;
        tracing::info!("Document split into {} chunks", chunks.len());

        let index = VectorIndex::build(chunks.clone(), self.embedder.clone()).await?;
        self.state = SessionState::Indexed;

        self.chunks = chunks;
        self.index = Some(Arc::new(index));
        self.state = SessionState::Ready;

        Ok(DocumentSummary {
            characters: text.chars().count(),
            chunks: self.chunks.len(),
        })
    }

    /// Derive up to `themes.max_themes` theme labels for the loaded document
    pub async fn extract_themes(&self) -> Result<Vec<String>, RagError> {
        themes::extract_themes(
            self.chat.as_ref(),
            &self.chunks,
            self.config.themes.sample_chunks,
            self.config.themes.max_themes,
        )
        .await
    }

    /// Generate a learning session plan for one theme
    pub async fn generate_session_plan(
        &self,
        theme: &str,
        duration_minutes: u32,
    ) -> Result<String, RagError> {
        session_plan::generate_session_plan(
            self.chat.as_ref(),
            theme,
            duration_minutes,
            &self.config.session,
        )
        .await
    }

    /// Answer a question about the loaded document, with memory
    pub async fn ask(&mut self, question: &str) -> Result<String, RagError> {
        let index = self
            .index
            .as_ref()
            .ok_or(RetrievalError::IndexNotBuilt)?
            .clone();

        qa::answer_question(
            self.chat.as_ref(),
            &index,
            &mut self.memory,
            question,
            self.config.retrieval.top_k,
        )
        .await
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The conversation so far
    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Drop the conversation history
    pub fn clear_memory(&mut self) {
        self.memory.clear();
    }

    /// The configuration used by this session
    pub fn config(&self) -> &Config {
        &self.config
    }
}
