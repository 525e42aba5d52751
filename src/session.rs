//! Event-driven composition of the workflow components.
//!
//! A session owns the document and all controller state; `handle_event` is
//! the single mutator. Remote calls run on spawned tasks and post their
//! outcomes back through the event channel, so completions are serialized
//! with user events and the engine's request-id check can drop late arrivals.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::action::EditAction;
use crate::conversation::ConversationController;
use crate::document::{DocumentModel, Point};
use crate::message::ChatMessage;
use crate::selection::SelectionTracker;
use crate::service::{AssistantService, ChatResponse, EditRequest};
use crate::suggestion::{PreviewState, SuggestionEngine};

#[derive(Debug)]
pub enum SessionEvent {
    /// The document's selection changed.
    SelectionChanged,
    /// The user picked an action on the floating toolbar.
    EditRequested(EditAction),
    /// The user accepted the open preview.
    ConfirmSuggestion,
    /// The user dismissed the open preview.
    CancelSuggestion,
    /// The user submitted a chat message.
    ChatSubmitted(String),
    /// A suggestion call resolved; errors arrive as display strings.
    SuggestionResolved {
        id: u64,
        result: Result<String, String>,
    },
    /// A chat call resolved.
    ChatResolved(Result<ChatResponse, String>),
}

pub struct EditorSession<D: DocumentModel> {
    document: D,
    tracker: SelectionTracker,
    engine: SuggestionEngine,
    conversation: ConversationController,
    service: Arc<dyn AssistantService>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
}

impl<D: DocumentModel> EditorSession<D> {
    /// Build a session. The returned receiver yields completion events
    /// posted by remote-call tasks; feed them back into [`Self::handle_event`].
    pub fn new(
        document: D,
        service: Arc<dyn AssistantService>,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let session = Self {
            document,
            tracker: SelectionTracker::new(),
            engine: SuggestionEngine::new(),
            conversation: ConversationController::new(),
            service,
            events_tx,
        };
        (session, events_rx)
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn anchor(&self) -> Option<Point> {
        self.tracker.anchor()
    }

    pub fn preview(&self) -> Option<&PreviewState> {
        self.engine.preview()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.conversation.messages()
    }

    pub fn is_chat_in_flight(&self) -> bool {
        self.conversation.is_in_flight()
    }

    /// A sender for hosts that want to inject events from other tasks.
    pub fn sender(&self) -> mpsc::UnboundedSender<SessionEvent> {
        self.events_tx.clone()
    }

    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::SelectionChanged => {
                self.tracker.on_selection_changed(&self.document);
            }
            SessionEvent::EditRequested(action) => self.request_edit(action),
            SessionEvent::ConfirmSuggestion => {
                if let Some(applied) = self.engine.confirm(&mut self.document) {
                    self.conversation.note_applied_suggestion(applied.summary);
                }
            }
            SessionEvent::CancelSuggestion => {
                self.engine.cancel();
            }
            SessionEvent::ChatSubmitted(text) => self.send_chat(&text),
            SessionEvent::SuggestionResolved { id, result } => {
                self.engine.resolve(id, result);
            }
            SessionEvent::ChatResolved(Ok(response)) => {
                self.conversation.finish_turn(response, &mut self.document);
            }
            SessionEvent::ChatResolved(Err(message)) => {
                self.conversation.finish_turn_err(&message);
            }
        }
    }

    fn request_edit(&mut self, action: EditAction) {
        let Some(capture) = self.tracker.capture(&self.document) else {
            return;
        };
        let id = self.engine.begin(capture.text.clone(), capture.range);
        debug!(id, action = action.as_str(), "dispatching edit request");

        let service = self.service.clone();
        let tx = self.events_tx.clone();
        let request = EditRequest {
            text: capture.text,
            action: action.as_str().to_string(),
        };
        tokio::spawn(async move {
            let result = match service.edit(request).await {
                Ok(response) => Ok(response.suggestion),
                Err(e) => Err(format!("Error: {}", e)),
            };
            let _ = tx.send(SessionEvent::SuggestionResolved { id, result });
        });
    }

    fn send_chat(&mut self, text: &str) {
        let Some(request) = self.conversation.begin_turn(text, &self.document) else {
            return;
        };
        let service = self.service.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = service.chat(request).await.map_err(|e| e.to_string());
            let _ = tx.send(SessionEvent::ChatResolved(result));
        });
    }
}
