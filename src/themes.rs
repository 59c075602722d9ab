use crate::chunker::Chunk;
use crate::error::RagError;
use crate::provider::{ChatMessage, ChatModel};
use regex::Regex;
use std::sync::LazyLock;

/// Leading list markers the model tends to prepend: "-", "*", "•", "1.", "1)"
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s*").expect("valid regex"));

const THEME_INSTRUCTION: &str = "You are an AI trained to analyze documents and extract key \
themes. Provide the major themes from the following text, one theme per line, with no \
commentary before or after the list.";

/// Ask the model for up to `max_themes` theme labels over the leading chunks
///
/// Samples the first `sample_chunks` chunks (or all of them if the document
/// is shorter) and issues a single instruction. The response is parsed into
/// trimmed, marker-stripped labels; if the model produces fewer than
/// `max_themes` usable lines, the shorter list is returned as-is. That is
/// a valid result, not an error.
pub async fn extract_themes(
    model: &dyn ChatModel,
    chunks: &[Chunk],
    sample_chunks: usize,
    max_themes: usize,
) -> Result<Vec<String>, RagError> {
    let sample: Vec<&str> = chunks
        .iter()
        .take(sample_chunks)
        .map(|c| c.content.as_str())
        .collect();

    if sample.is_empty() {
        return Err(RagError::EmptyInput(
            "cannot extract themes from zero chunks".to_string(),
        ));
    }

    tracing::info!(
        "Extracting up to {} themes from {} sampled chunks",
        max_themes,
        sample.len()
    );

    let messages = [
        ChatMessage::system(format!(
            "{} Provide {} themes.",
            THEME_INSTRUCTION, max_themes
        )),
        ChatMessage::user(sample.join("\n")),
    ];

    let response = model.complete(&messages).await?;
    Ok(parse_theme_lines(&response, max_themes))
}

/// Parse a model response into clean theme labels
fn parse_theme_lines(response: &str, max_themes: usize) -> Vec<String> {
    response
        .lines()
        .map(|line| LIST_MARKER.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .take(max_themes)
        .collect()
}
