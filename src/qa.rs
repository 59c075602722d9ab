use crate::error::RagError;
use crate::index::VectorIndex;
use crate::memory::ConversationMemory;
use crate::provider::{ChatMessage, ChatModel};

const QA_INSTRUCTION: &str = "You are a helpful assistant answering questions about a document. \
Answer using only the excerpts below; say so plainly when they do not contain the answer.";

/// Answer a question over the document with conversational memory
///
/// Retrieves the `top_k` most relevant chunks, sends them together with the
/// prior turns and the question in a single model call, and appends the new
/// `(question, answer)` turn to memory. Memory is only touched after the
/// model call succeeds; a failed retrieval or completion leaves it exactly
/// as it was.
pub async fn answer_question(
    model: &dyn ChatModel,
    index: &VectorIndex,
    memory: &mut ConversationMemory,
    question: &str,
    top_k: usize,
) -> Result<String, RagError> {
    let retrieved = index.search(question, top_k).await?;

    tracing::debug!(
        "Answering with {} retrieved chunks and {} prior turns",
        retrieved.len(),
        memory.len()
    );

    let context = retrieved
        .iter()
        .map(|scored| scored.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");

    let mut messages =
        Vec::with_capacity(2 + memory.len() * 2);
    messages.push(ChatMessage::system(format!(
        "{}\n\nDocument excerpts:\n\n{}",
        QA_INSTRUCTION, context
    )));

    for turn in memory.turns() {
        messages.push(ChatMessage::user(turn.question.clone()));
        messages.push(ChatMessage::assistant(turn.answer.clone()));
    }

    messages.push(ChatMessage::user(question));

    let answer = model.complete(&messages).await?;

    memory.push(question, answer.clone());
    Ok(answer)
}
