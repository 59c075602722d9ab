//! # Document RAG - Retrieval-Augmented Question Answering over PDFs
//!
//! A library for building document question-answering assistants: extract
//! text from a PDF, split it into overlapping chunks, embed the chunks into
//! an in-memory vector index, derive the document's major themes, generate
//! theme-centered learning sessions, and answer questions over the document
//! with conversational memory.
//!
//! ## Overview
//!
//! The crate is the retrieval-augmented core only. It exposes a small
//! functional API to whatever presentation shell sits on top (web UI, CLI,
//! service); the shell is responsible for file upload, key entry, and
//! progress display. External capabilities (the embedding provider, the
//! chat model, PDF parsing) are consumed through narrow interfaces.
//!
//! ## Key Features
//!
//! - **Lossless chunking**: overlapping character windows that cut at
//!   paragraph, line, sentence, and word boundaries before hard cuts
//! - **In-memory vector search**: cosine similarity over per-document
//!   chunk embeddings, read-only after construction
//! - **Two chat backends**: OpenAI and Gemini behind one [`provider::ChatModel`]
//!   trait, selected once at construction
//! - **Theme extraction**: one-shot derivation of up to five theme labels
//!   from the document's leading chunks
//! - **Conversational memory**: per-session question/answer history fed
//!   back to the model, appended only on success
//!
//! ## Architecture
//!
//! ```text
//! PDF bytes ─▶ extractor ─▶ chunker ─▶ VectorIndex ◀─ EmbeddingProvider
//!                              │            │
//!                              ▼            ▼
//!                           themes         qa ◀─▶ ConversationMemory
//!                              │            │
//!                              ▼            ▼
//!                         session_plan   answer          ◀─ ChatModel
//! ```
//!
//! All of it hangs off one [`DocumentSession`] per document.
//!
//! ## Modules
//!
//! - [`session`]: per-document orchestration and lifecycle state machine
//! - [`extractor`]: PDF text extraction
//! - [`chunker`]: overlapping fixed-size text chunking
//! - [`index`]: in-memory cosine-similarity vector index
//! - [`provider`]: chat and embedding provider traits plus both backends
//! - [`themes`]: document theme extraction
//! - [`session_plan`]: experiential-learning session generation
//! - [`qa`]: retrieval-augmented question answering
//! - [`memory`]: conversation history
//! - [`config`]: configuration with environment variable support
//! - [`error`]: error types
//! - [`paths`]: platform config path utilities

/// Overlapping fixed-size text chunking
pub mod chunker;

/// Configuration management with environment variable overrides
pub mod config;

/// Error types and utilities
pub mod error;

/// PDF text extraction
pub mod extractor;

/// In-memory cosine-similarity vector index
pub mod index;

/// Conversation history for the QA loop
pub mod memory;

/// Platform path utilities
pub mod paths;

/// Chat and embedding provider interfaces and backends
pub mod provider;

/// Retrieval-augmented question answering with memory
pub mod qa;

/// Per-document session orchestration
pub mod session;

/// Experiential-learning session generation
pub mod session_plan;

/// Document theme extraction
pub mod themes;

pub use chunker::{Chunk, TextChunker};
pub use config::Config;
pub use error::RagError;
pub use index::{ScoredChunk, VectorIndex};
pub use memory::{ConversationMemory, Turn};
pub use provider::{ChatMessage, ChatModel, EmbeddingProvider, ModelBackend, Role};
pub use session::{DocumentSession, DocumentSummary, SessionState};
