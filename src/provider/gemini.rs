use super::{ChatMessage, ChatModel, Role};
use crate::error::ModelError;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini chat completion backend
///
/// Behaviorally equivalent to [`super::OpenAiChat`] through the
/// [`ChatModel`] interface. Gemini has no in-band system role, so system
/// messages are lifted into the request's `systemInstruction` field and
/// assistant turns map to the `model` role.
pub struct GeminiChat {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiChat {
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

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", API_BASE, self.model)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// Translate the provider-neutral message list into Gemini's wire shape
fn to_wire(messages: &[ChatMessage]) -> GenerateRequest {
    let mut system_parts = Vec::new();
    let mut contents = Vec::new();

    for message in messages {
        match message.role {
            Role::System => system_parts.push(Part {
                text: message.content.clone(),
            }),
            Role::User | Role::Assistant => contents.push(Content {
                role: Some(
                    match message.role {
                        Role::User => "user",
                        _ => "model",
                    }
                    .to_string(),
                ),
                parts: vec![Part {
                    text: message.content.clone(),
                }],
            }),
        }
    }

    // Gemini rejects an empty contents array even when a system
    // instruction is present.
    if contents.is_empty() && !system_parts.is_empty() {
        contents.push(Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: "Please respond to the instructions above.".to_string(),
            }],
        });
    }

    GenerateRequest {
        system_instruction: if system_parts.is_empty() {
            None
        } else {
            Some(Content {
                role: None,
                parts: system_parts,
            })
        },
        contents,
    }
}

#[async_trait::async_trait]
impl ChatModel for GeminiChat {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ModelError> {
        let request = to_wire(messages);

        tracing::debug!("Gemini chat request with {} messages", messages.len());

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::RequestFailed(e.to_string()))?;

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

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ModelError::EmptyResponse);
        }

        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_message_becomes_system_instruction() {
        let messages = vec![ChatMessage::system("analyze"), ChatMessage::user("go")];
        let wire = to_wire(&messages);

        let system = wire.system_instruction.unwrap();
        assert_eq!(system.parts[0].text, "analyze");
        assert_eq!(wire.contents.len(), 1);
        assert_eq!(wire.contents[0].role.as_deref(), Some("user"));
    }

    #[test]
    fn test_assistant_maps_to_model_role() {
        let messages = vec![
            ChatMessage::user("q1"),
            ChatMessage::assistant("a1"),
            ChatMessage::user("q2"),
        ];
        let wire = to_wire(&messages);

        assert!(wire.system_instruction.is_none());
        let roles: Vec<_> = wire
            .contents
            .iter()
            .map(|c| c.role.as_deref().unwrap())
            .collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
    }

    #[test]
    fn test_system_only_prompt_gets_a_user_turn() {
        let messages = vec![ChatMessage::system("design a session")];
        let wire = to_wire(&messages);

        assert!(wire.system_instruction.is_some());
        assert_eq!(wire.contents.len(), 1);
        assert_eq!(wire.contents[0].role.as_deref(), Some("user"));
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let wire = to_wire(&[ChatMessage::system("s"), ChatMessage::user("u")]);
        let json = serde_json::to_value(&wire).unwrap();
        assert!(json.get("systemInstruction").is_some());
        assert_eq!(json["contents"][0]["parts"][0]["text"], "u");
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Theme one"},{"text":"\nTheme two"}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        let joined: String = parsed.candidates[0]
            .content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(joined, "Theme one\nTheme two");
    }

    #[test]
    fn test_endpoint_includes_model() {
        let chat = GeminiChat::new("g-key", "gemini-1.5-flash", 30).unwrap();
        assert!(chat.endpoint().ends_with("gemini-1.5-flash:generateContent"));
        assert_eq!(chat.model_name(), "gemini-1.5-flash");
    }
}
