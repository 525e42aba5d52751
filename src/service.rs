//! The assistant service boundary.
//!
//! Two operations, chat and edit, both single-request/single-response. The
//! workflow layer only sees [`AssistantService`]; behind it sits either the
//! in-process Gemini-backed implementation or a remote deployment of the same
//! JSON protocol.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::action::EditAction;
use crate::ai::{GeminiClient, GeminiFunctionCall};
use crate::error::{ServiceError, ServiceResult};
use crate::message::{ChatTurn, ToolResult, TOOL_INSERT_TO_EDITOR};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const SYSTEM_PROMPT: &str = "You are an AI assistant integrated into a collaborative text editor. You can:

1. Have normal conversations with users
2. Help improve and edit text
3. Provide suggestions and feedback
4. Search for information and provide summaries (simulated)

Be helpful, concise, and professional. When users ask for web searches or current information, provide helpful responses based on your training data. Use the insertToEditor tool when the user asks you to put content into the document.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatTurn>,
    #[serde(rename = "selectedText")]
    pub selected_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
    #[serde(rename = "toolResults", default, skip_serializing_if = "Option::is_none")]
    pub tool_results: Option<Vec<ToolResult>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditRequest {
    pub text: String,
    pub action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditResponse {
    pub suggestion: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// The remote assistant operations of the editor core.
#[async_trait]
pub trait AssistantService: Send + Sync {
    async fn chat(&self, request: ChatRequest) -> ServiceResult<ChatResponse>;
    async fn edit(&self, request: EditRequest) -> ServiceResult<EditResponse>;
}

fn chat_system_prompt(selected_text: Option<&str>) -> String {
    match selected_text {
        Some(text) => format!(
            "{}\n\nThe user has selected this text in the editor: \"{}\"",
            SYSTEM_PROMPT, text
        ),
        None => SYSTEM_PROMPT.to_string(),
    }
}

fn tool_result_from_call(call: &GeminiFunctionCall) -> Option<ToolResult> {
    if call.name != TOOL_INSERT_TO_EDITOR {
        warn!(tool = %call.name, "model requested an undeclared tool");
        return Some(ToolResult::Other {
            tool_name: call.name.clone(),
        });
    }
    let kind = call.args.get("type").and_then(|v| v.as_str())?;
    let content = call
        .args
        .get("content")
        .and_then(|v| v.as_str())?
        .to_string();
    match kind {
        "append" => Some(ToolResult::Append { content }),
        "replace" => Some(ToolResult::Replace { content }),
        _ => Some(ToolResult::Other {
            tool_name: call.name.clone(),
        }),
    }
}

/// In-process assistant backed by the Gemini API.
///
/// Holds the credential check, the fixed system prompt, and the edit
/// instruction templates. Built without a key it still constructs, but every
/// call fails with the distinct configuration error.
#[derive(Clone)]
pub struct GeminiAssistant {
    client: Option<GeminiClient>,
    model: String,
}

impl GeminiAssistant {
    pub fn new(api_key: Option<&str>) -> Self {
        Self {
            client: api_key.map(GeminiClient::new),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(api_key: Option<&str>, model: &str) -> Self {
        Self {
            client: api_key.map(GeminiClient::new),
            model: model.to_string(),
        }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        let key = config.resolve_api_key();
        let model = config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let client = key.as_deref().map(|k| match config.api_base_url.as_deref() {
            Some(base) => GeminiClient::with_base_url(k, base),
            None => GeminiClient::new(k),
        });
        Self {
            client,
            model,
        }
    }

    fn client(&self) -> ServiceResult<&GeminiClient> {
        self.client.as_ref().ok_or(ServiceError::MissingApiKey)
    }
}

#[async_trait]
impl AssistantService for GeminiAssistant {
    async fn chat(&self, request: ChatRequest) -> ServiceResult<ChatResponse> {
        let client = self.client()?;
        let system = chat_system_prompt(request.selected_text.as_deref());

        let reply = client
            .generate_chat(&self.model, &system, &request.messages)
            .await
            .map_err(|e| match e {
                ServiceError::MissingApiKey => e,
                other => ServiceError::Service(format!("Chat processing failed: {}", other)),
            })?;

        let tool_results: Vec<ToolResult> = reply
            .function_calls
            .iter()
            .filter_map(tool_result_from_call)
            .collect();
        debug!(tools = tool_results.len(), "chat turn completed");

        Ok(ChatResponse {
            content: reply.text,
            tool_results: if tool_results.is_empty() {
                None
            } else {
                Some(tool_results)
            },
        })
    }

    async fn edit(&self, request: EditRequest) -> ServiceResult<EditResponse> {
        let client = self.client()?;
        let action = EditAction::parse(&request.action);
        let prompt = action.instruction(&request.text);

        let suggestion = client
            .generate_text(&self.model, &prompt, 0.7)
            .await
            .map_err(|e| match e {
                ServiceError::MissingApiKey => e,
                other => ServiceError::Service(format!("Edit processing failed: {}", other)),
            })?;

        Ok(EditResponse { suggestion })
    }
}

/// Client for an assistant service hosted elsewhere, speaking the same JSON
/// protocol: POST `{base}/api/chat` and `{base}/api/edit`, failures carried
/// as `{ "error": ... }` bodies.
#[derive(Clone)]
pub struct RemoteAssistant {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteAssistant {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        request: &Req,
    ) -> ServiceResult<Resp> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        // Error bodies carry a single `error` field, on any status code.
        if let Ok(err) = serde_json::from_str::<ErrorBody>(&body) {
            return Err(ServiceError::Service(err.error));
        }
        if !status.is_success() {
            return Err(ServiceError::Service(format!(
                "assistant request failed with status {}",
                status
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| ServiceError::Service(format!("malformed response: {}", e)))
    }
}

#[async_trait]
impl AssistantService for RemoteAssistant {
    async fn chat(&self, request: ChatRequest) -> ServiceResult<ChatResponse> {
        self.post("/api/chat", &request).await
    }

    async fn edit(&self, request: EditRequest) -> ServiceResult<EditResponse> {
        self.post("/api/edit", &request).await
    }
}
