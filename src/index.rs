use crate::chunker::Chunk;
use crate::error::{EmbeddingError, RagError};
use crate::provider::EmbeddingProvider;
use std::sync::Arc;

/// A chunk returned from a similarity search, with its score
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    /// Cosine similarity to the query, in [-1, 1]
    pub score: f32,
}

/// An in-memory similarity index over one document's chunks
///
/// The distance metric is cosine similarity, fixed at construction. The
/// index is built once per document, is read-only afterwards, and is safe
/// to share across readers (`Arc<VectorIndex>`). Building uses the
/// embedding provider once for the whole chunk batch; searching embeds the
/// query and scans every entry, which is the right trade-off for a
/// single-document corpus.
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    embedder: Arc<dyn EmbeddingProvider>,
}

struct IndexEntry {
    chunk: Chunk,
    embedding: Vec<f32>,
}

impl std::fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndex")
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl VectorIndex {
    /// Embed every chunk and build the index
    ///
    /// Fails with [`RagError::EmptyInput`] for an empty chunk list and with
    /// an [`EmbeddingError`] when the provider misbehaves. Embedding order
    /// stays aligned with chunk order.
    pub async fn build(
        chunks: Vec<Chunk>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, RagError> {
        if chunks.is_empty() {
            return Err(RagError::EmptyInput(
                "cannot build a vector index from zero chunks".to_string(),
            ));
        }

        tracing::info!("Building vector index over {} chunks", chunks.len());

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = embedder.embed_batch(texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: chunks.len(),
                actual: embeddings.len(),
            }
            .into());
        }

        let entries = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexEntry { chunk, embedding })
            .collect();

        Ok(Self { entries, embedder })
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the `k` chunks nearest to the query text
    ///
    /// Returns `min(k, len)` results ordered nearest-first. The sort is
    /// stable, so equal scores keep the original chunk order.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>, RagError> {
        let query_embedding = self
            .embedder
            .embed_batch(vec![query.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or(EmbeddingError::CountMismatch {
                expected: 1,
                actual: 0,
            })?;

        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(&query_embedding, &entry.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        tracing::debug!("Search returned {} of {} chunks", scored.len(), self.len());
        Ok(scored)
    }
}

/// Cosine similarity between two vectors; 0.0 for mismatched or zero vectors
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmbeddingError;
    use crate::provider::EmbeddingProvider;

    /// Deterministic embedder: maps known words to fixed unit vectors
    struct StubEmbedder;

    #[async_trait::async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(texts
                .iter()
                .map(|text| {
                    if text.contains("alpha") {
                        vec![1.0, 0.0, 0.0]
                    } else if text.contains("beta") {
                        vec![0.0, 1.0, 0.0]
                    } else {
                        vec![0.0, 0.0, 1.0]
                    }
                })
                .collect())
        }

        fn model_name(&self) -> &str {
            "stub"
        }
    }

    /// Embedder that returns the wrong number of vectors
    struct ShortEmbedder;

    #[async_trait::async_trait]
    impl EmbeddingProvider for ShortEmbedder {
        async fn embed_batch(&self, _texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(vec![vec![1.0]])
        }

        fn model_name(&self) -> &str {
            "short"
        }
    }

    fn chunks(contents: &[&str]) -> Vec<Chunk> {
        contents
            .iter()
            .enumerate()
            .map(|(index, content)| Chunk {
                content: content.to_string(),
                index,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_empty_chunk_list_is_rejected() {
        let err = VectorIndex::build(vec![], Arc::new(StubEmbedder))
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::EmptyInput(_)));
    }

    #[tokio::test]
    async fn test_build_aligns_embeddings_with_chunks() {
        let index = VectorIndex::build(
            chunks(&["alpha text", "beta text", "other text"]),
            Arc::new(StubEmbedder),
        )
        .await
        .unwrap();
        assert_eq!(index.len(), 3);
        assert!(!index.is_empty());
    }

    #[tokio::test]
    async fn test_embedding_count_mismatch_fails_build() {
        let err = VectorIndex::build(chunks(&["a", "b"]), Arc::new(ShortEmbedder))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RagError::Embedding(EmbeddingError::CountMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[tokio::test]
    async fn test_search_returns_nearest_first() {
        let index = VectorIndex::build(
            chunks(&["beta text", "alpha text", "other text"]),
            Arc::new(StubEmbedder),
        )
        .await
        .unwrap();

        let results = index.search("alpha query", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.content, "alpha text");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_search_never_exceeds_k_or_index_size() {
        let index = VectorIndex::build(chunks(&["alpha", "beta"]), Arc::new(StubEmbedder))
            .await
            .unwrap();

        assert_eq!(index.search("alpha", 1).await.unwrap().len(), 1);
        assert_eq!(index.search("alpha", 10).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_ties_keep_original_chunk_order() {
        // All three chunks land on the same stub vector, so every score
        // ties and the stable sort must keep source order.
        let index = VectorIndex::build(
            chunks(&["other one", "other two", "other three"]),
            Arc::new(StubEmbedder),
        )
        .await
        .unwrap();

        let results = index.search("other query", 3).await.unwrap();
        let order: Vec<usize> = results.iter().map(|r| r.chunk.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_search_has_no_duplicates() {
        let index = VectorIndex::build(
            chunks(&["alpha one", "alpha two", "beta one"]),
            Arc::new(StubEmbedder),
        )
        .await
        .unwrap();

        let results = index.search("alpha", 3).await.unwrap();
        let mut indices: Vec<usize> = results.iter().map(|r| r.chunk.index).collect();
        indices.sort_unstable();
        indices.dedup();
        assert_eq!(indices.len(), 3);
    }

    #[test]
    fn test_cosine_similarity() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]), 1.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]), -1.0);
        // Mismatched lengths and zero vectors degrade to 0.0
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
