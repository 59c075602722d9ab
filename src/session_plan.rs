use crate::config::SessionConfig;
use crate::error::{ConfigError, RagError};
use crate::provider::{ChatMessage, ChatModel};

/// Generate an experiential-learning session plan for one theme
///
/// The duration must fall inside the configured bounds. The model's text is
/// returned verbatim, without parsing or caching.
pub async fn generate_session_plan(
    model: &dyn ChatModel,
    theme: &str,
    duration_minutes: u32,
    bounds: &SessionConfig,
) -> Result<String, RagError> {
    if duration_minutes < bounds.min_duration_minutes
        || duration_minutes > bounds.max_duration_minutes
    {
        return Err(ConfigError::InvalidValue {
            key: "duration_minutes".to_string(),
            reason: format!(
                "must be between {} and {}, got {}",
                bounds.min_duration_minutes, bounds.max_duration_minutes, duration_minutes
            ),
        }
        .into());
    }

    tracing::info!(
        "Generating a {}-minute learning session on '{}'",
        duration_minutes,
        theme
    );

    let prompt = ChatMessage::system(format!(
        "You are an expert in experiential learning design. Create a {}-minute learning \
         session on '{}'.",
        duration_minutes, theme
    ));

    let plan = model.complete(&[prompt]).await?;
    Ok(plan)
}
