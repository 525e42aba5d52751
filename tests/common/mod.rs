//! Mock assistant service for integration tests.
//!
//! Returns queued responses in order and records every request it sees.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use coauthor::{
    AssistantService, ChatRequest, ChatResponse, EditRequest, EditResponse, ServiceError,
    ServiceResult,
};

#[derive(Default)]
pub struct MockAssistant {
    edits: Mutex<VecDeque<Result<String, String>>>,
    chats: Mutex<VecDeque<Result<ChatResponse, String>>>,
    /// Record all requests received (for verification)
    pub seen_edits: Mutex<Vec<EditRequest>>,
    pub seen_chats: Mutex<Vec<ChatRequest>>,
}

impl MockAssistant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_edit(&self, result: Result<&str, &str>) {
        self.edits
            .lock()
            .unwrap()
            .push_back(result.map(str::to_string).map_err(str::to_string));
    }

    pub fn queue_chat_reply(&self, response: ChatResponse) {
        self.chats.lock().unwrap().push_back(Ok(response));
    }

    pub fn queue_chat_failure(&self, message: &str) {
        self.chats.lock().unwrap().push_back(Err(message.to_string()));
    }

    pub fn edit_calls(&self) -> usize {
        self.seen_edits.lock().unwrap().len()
    }

    pub fn chat_calls(&self) -> usize {
        self.seen_chats.lock().unwrap().len()
    }
}

#[async_trait]
impl AssistantService for MockAssistant {
    async fn chat(&self, request: ChatRequest) -> ServiceResult<ChatResponse> {
        self.seen_chats.lock().unwrap().push(request);
        match self.chats.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(ServiceError::Service(message)),
            None => Ok(ChatResponse {
                content: "ok".to_string(),
                tool_results: None,
            }),
        }
    }

    async fn edit(&self, request: EditRequest) -> ServiceResult<EditResponse> {
        self.seen_edits.lock().unwrap().push(request);
        match self.edits.lock().unwrap().pop_front() {
            Some(Ok(suggestion)) => Ok(EditResponse { suggestion }),
            Some(Err(message)) => Err(ServiceError::Service(message)),
            None => Ok(EditResponse {
                suggestion: "suggestion".to_string(),
            }),
        }
    }
}
