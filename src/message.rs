//! Chat log types shared between the conversation controller and the
//! assistant service, plus the wire encoding of tool results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tool name the assistant uses to mutate the document.
pub const TOOL_INSERT_TO_EDITOR: &str = "insertToEditor";

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A role + content pair, the shape sent to the assistant service.
/// Timestamps and ids are local bookkeeping and never leave the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// An entry in the append-only conversation log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_results: Vec<ToolResult>,
}

impl ChatMessage {
    pub fn turn(&self) -> ChatTurn {
        ChatTurn {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

/// A document-mutation payload attached to an assistant reply.
///
/// `Other` absorbs tool kinds this crate does not handle; the applier skips
/// them so one unknown tool cannot poison the whole reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireToolResult", into = "WireToolResult")]
pub enum ToolResult {
    Append { content: String },
    Replace { content: String },
    Other { tool_name: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireToolResult {
    #[serde(rename = "toolName")]
    tool_name: String,
    #[serde(default)]
    result: WirePayload,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WirePayload {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    content: String,
}

impl From<WireToolResult> for ToolResult {
    fn from(wire: WireToolResult) -> Self {
        if wire.tool_name != TOOL_INSERT_TO_EDITOR {
            return ToolResult::Other {
                tool_name: wire.tool_name,
            };
        }
        match wire.result.kind.as_str() {
            "append" => ToolResult::Append {
                content: wire.result.content,
            },
            "replace" => ToolResult::Replace {
                content: wire.result.content,
            },
            _ => ToolResult::Other {
                tool_name: wire.tool_name,
            },
        }
    }
}

impl From<ToolResult> for WireToolResult {
    fn from(result: ToolResult) -> Self {
        match result {
            ToolResult::Append { content } => WireToolResult {
                tool_name: TOOL_INSERT_TO_EDITOR.to_string(),
                result: WirePayload {
                    kind: "append".to_string(),
                    content,
                },
            },
            ToolResult::Replace { content } => WireToolResult {
                tool_name: TOOL_INSERT_TO_EDITOR.to_string(),
                result: WirePayload {
                    kind: "replace".to_string(),
                    content,
                },
            },
            ToolResult::Other { tool_name } => WireToolResult {
                tool_name,
                result: WirePayload::default(),
            },
        }
    }
}
