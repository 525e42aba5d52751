//! The conversation controller: the append-only chat log, the single-flight
//! send guard, and the application of assistant tool results to the document.

use chrono::Utc;
use tracing::{debug, warn};

use crate::document::{DocumentModel, Range};
use crate::message::{ChatMessage, ChatRole, ToolResult};
use crate::service::{ChatRequest, ChatResponse};

const GREETING: &str = "Hello! I'm your AI assistant with advanced capabilities. I can help you edit text, search the web for current information, and insert content directly into your editor. Try asking me to 'search for the latest Next.js 15 features and insert a summary' or select text and use the floating toolbar!";

pub struct ConversationController {
    messages: Vec<ChatMessage>,
    next_id: u64,
    in_flight: bool,
    // Selection captured when the in-flight turn was sent; replace tool
    // results target this range, not whatever is selected at reply time.
    pending_selection: Option<Range>,
}

impl ConversationController {
    pub fn new() -> Self {
        let mut controller = Self {
            messages: Vec::new(),
            next_id: 0,
            in_flight: false,
            pending_selection: None,
        };
        controller.push(ChatRole::Assistant, GREETING.to_string(), Vec::new());
        controller
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Start a user turn. Returns the request to send, or `None` when the
    /// text is blank or another turn is still in flight.
    pub fn begin_turn(&mut self, text: &str, doc: &impl DocumentModel) -> Option<ChatRequest> {
        if text.trim().is_empty() {
            return None;
        }
        if self.in_flight {
            debug!("rejecting chat send while a turn is in flight");
            return None;
        }

        let selection = doc.current_selection();
        let selected_text = if selection.is_empty() {
            None
        } else {
            Some(doc.text_in_range(selection))
        };
        self.pending_selection = (!selection.is_empty()).then_some(selection);

        self.push(ChatRole::User, text.to_string(), Vec::new());
        self.in_flight = true;

        Some(ChatRequest {
            messages: self.messages.iter().map(ChatMessage::turn).collect(),
            selected_text,
        })
    }

    /// Record a successful reply: apply its tool results to the document,
    /// then append the assistant message carrying content and raw results.
    pub fn finish_turn(&mut self, response: ChatResponse, doc: &mut impl DocumentModel) {
        let tool_results = response.tool_results.unwrap_or_default();
        for result in &tool_results {
            self.apply_tool_result(result, doc);
        }
        self.push(ChatRole::Assistant, response.content, tool_results);
        self.in_flight = false;
        self.pending_selection = None;
    }

    /// Record a failed reply. Failures become visible assistant messages and
    /// never block the next turn.
    pub fn finish_turn_err(&mut self, message: &str) {
        self.push(
            ChatRole::Assistant,
            format!("Sorry, I encountered an error: {}", message),
            Vec::new(),
        );
        self.in_flight = false;
        self.pending_selection = None;
    }

    /// Append the summary entry for a confirmed suggestion.
    pub fn note_applied_suggestion(&mut self, summary: String) {
        self.push(ChatRole::Assistant, summary, Vec::new());
    }

    fn apply_tool_result(&mut self, result: &ToolResult, doc: &mut impl DocumentModel) {
        match result {
            ToolResult::Append { content } => {
                let end = doc.end();
                doc.set_selection(Range::caret(end));
                doc.replace_range(Range::caret(end), &format!("\n\n{}", content));
            }
            ToolResult::Replace { content } => match self.pending_selection.take() {
                Some(range) => doc.replace_range(range, content),
                None => {
                    warn!("replace tool result with no captured selection, skipping");
                }
            },
            ToolResult::Other { tool_name } => {
                debug!(tool = %tool_name, "ignoring unhandled tool result");
            }
        }
    }

    fn push(&mut self, role: ChatRole, content: String, tool_results: Vec<ToolResult>) {
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id: self.next_id,
            role,
            content,
            timestamp: Utc::now(),
            tool_results,
        });
    }
}

impl Default for ConversationController {
    fn default() -> Self {
        Self::new()
    }
}
