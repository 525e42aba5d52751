use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ServiceError, ServiceResult};
use crate::message::{ChatRole, ChatTurn, TOOL_INSERT_TO_EDITOR};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Serialize)]
struct GeminiRequest {
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTool>,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize, Default)]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "functionCall", skip_serializing_if = "Option::is_none")]
    function_call: Option<GeminiFunctionCall>,
}

/// A function invocation requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiFunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Serialize)]
struct GeminiTool {
    #[serde(rename = "functionDeclarations")]
    function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Serialize)]
struct FunctionDeclaration {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

/// Text plus any function calls the model asked for.
#[derive(Debug, Clone, Default)]
pub struct GeminiReply {
    pub text: String,
    pub function_calls: Vec<GeminiFunctionCall>,
}

fn insert_to_editor_tool() -> GeminiTool {
    GeminiTool {
        function_declarations: vec![FunctionDeclaration {
            name: TOOL_INSERT_TO_EDITOR.to_string(),
            description: "Insert content into the user's document, either appended at the end or replacing the currently selected text".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "type": {
                        "type": "string",
                        "enum": ["append", "replace"],
                        "description": "Where to put the content"
                    },
                    "content": {
                        "type": "string",
                        "description": "The text to insert"
                    }
                },
                "required": ["type", "content"]
            }),
        }],
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// One conversational turn: system instruction, history, and the
    /// `insertToEditor` tool declared so the model can request mutations.
    pub async fn generate_chat(
        &self,
        model: &str,
        system: &str,
        turns: &[ChatTurn],
    ) -> ServiceResult<GeminiReply> {
        let contents = turns
            .iter()
            .map(|turn| GeminiContent {
                role: Some(
                    match turn.role {
                        ChatRole::User => "user",
                        ChatRole::Assistant => "model",
                    }
                    .to_string(),
                ),
                parts: vec![GeminiPart {
                    text: Some(turn.content.clone()),
                    function_call: None,
                }],
            })
            .collect();

        let request = GeminiRequest {
            system_instruction: Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: Some(system.to_string()),
                    function_call: None,
                }],
            }),
            contents,
            generation_config: None,
            tools: vec![insert_to_editor_tool()],
        };

        self.generate(model, &request).await
    }

    /// One-shot prompt completion, used for edit suggestions.
    pub async fn generate_text(
        &self,
        model: &str,
        prompt: &str,
        temperature: f32,
    ) -> ServiceResult<String> {
        let request = GeminiRequest {
            system_instruction: None,
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                    function_call: None,
                }],
            }],
            generation_config: Some(GenerationConfig { temperature }),
            tools: Vec::new(),
        };

        let reply = self.generate(model, &request).await?;
        Ok(reply.text)
    }

    async fn generate(&self, model: &str, request: &GeminiRequest) -> ServiceResult<GeminiReply> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        debug!(model, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ServiceError::Service(format!(
                "Gemini API error {}: {}",
                status, text
            )));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Service(format!("malformed Gemini response: {}", e)))?;

        let candidate = gemini_response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::Service("empty response from model".to_string()))?;

        let mut reply = GeminiReply::default();
        for part in candidate.content.parts {
            if let Some(text) = part.text {
                reply.text.push_str(&text);
            }
            if let Some(call) = part.function_call {
                reply.function_calls.push(call);
            }
        }
        Ok(reply)
    }
}
