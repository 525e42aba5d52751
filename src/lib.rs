pub mod action;
pub mod ai;
pub mod config;
pub mod conversation;
pub mod document;
pub mod error;
pub mod message;
pub mod selection;
pub mod service;
pub mod session;
pub mod suggestion;

// Re-export main types for convenience
pub use action::EditAction;
pub use ai::GeminiClient;
pub use config::Config;
pub use conversation::ConversationController;
pub use document::{DocumentModel, Point, Range, TextBuffer};
pub use error::{ServiceError, ServiceResult};
pub use message::{ChatMessage, ChatRole, ChatTurn, ToolResult};
pub use selection::{Capture, SelectionTracker};
pub use service::{
    AssistantService, ChatRequest, ChatResponse, EditRequest, EditResponse, GeminiAssistant,
    RemoteAssistant,
};
pub use session::{EditorSession, SessionEvent};
pub use suggestion::{Applied, PreviewPhase, PreviewState, SuggestionEngine};
