//! Preview lifecycle for AI edit suggestions.
//!
//! One preview at a time: `closed -> generating -> ready | errored -> closed`.
//! Every request carries a generated id; a resolution whose id no longer
//! matches the open preview is stale and dropped, so a response landing after
//! cancel can never clobber a newer preview.

use tracing::{debug, warn};

use crate::document::{DocumentModel, Range};

const SUMMARY_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewPhase {
    Generating,
    Ready,
    Errored(String),
}

/// The visible state of one in-flight or resolved suggestion.
#[derive(Debug, Clone)]
pub struct PreviewState {
    pub id: u64,
    pub original: String,
    pub suggestion: String,
    pub range: Range,
    pub phase: PreviewPhase,
}

impl PreviewState {
    /// What the preview surface shows in the suggestion slot: empty while
    /// generating, the suggestion when ready, the error message on failure.
    pub fn display_text(&self) -> &str {
        match &self.phase {
            PreviewPhase::Generating => "",
            PreviewPhase::Ready => &self.suggestion,
            PreviewPhase::Errored(message) => message,
        }
    }

    pub fn is_confirmable(&self) -> bool {
        self.phase == PreviewPhase::Ready
    }
}

/// A confirmed suggestion, ready to be recorded in the chat log.
#[derive(Debug, Clone)]
pub struct Applied {
    pub range: Range,
    pub text: String,
    pub summary: String,
}

#[derive(Debug, Default)]
pub struct SuggestionEngine {
    active: Option<PreviewState>,
    next_id: u64,
}

impl SuggestionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preview(&self) -> Option<&PreviewState> {
        self.active.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Open a preview in `Generating` for the captured span. Any preview
    /// still open is discarded; its pending response becomes stale.
    pub fn begin(&mut self, original: String, range: Range) -> u64 {
        if let Some(old) = &self.active {
            debug!(id = old.id, "discarding open preview for a new request");
        }
        self.next_id += 1;
        let id = self.next_id;
        self.active = Some(PreviewState {
            id,
            original,
            suggestion: String::new(),
            range,
            phase: PreviewPhase::Generating,
        });
        id
    }

    /// Deliver the remote outcome for request `id`. Returns `false` when the
    /// response is stale: the preview was cancelled, replaced, or already
    /// resolved.
    pub fn resolve(&mut self, id: u64, result: Result<String, String>) -> bool {
        let preview = match &mut self.active {
            Some(p) if p.id == id && p.phase == PreviewPhase::Generating => p,
            _ => {
                warn!(id, "dropping stale suggestion response");
                return false;
            }
        };
        match result {
            Ok(suggestion) => {
                preview.suggestion = suggestion;
                preview.phase = PreviewPhase::Ready;
            }
            Err(message) => {
                preview.phase = PreviewPhase::Errored(message);
            }
        }
        true
    }

    /// Apply the suggestion to the range captured at request time.
    ///
    /// Only a `Ready` preview confirms; while generating or errored this is a
    /// no-op, so an error message can never be written into the document.
    pub fn confirm(&mut self, doc: &mut impl DocumentModel) -> Option<Applied> {
        if !self.active.as_ref().is_some_and(|p| p.is_confirmable()) {
            return None;
        }
        let preview = self.active.take()?;
        doc.replace_range(preview.range, &preview.suggestion);

        let mut excerpt: String = preview.suggestion.chars().take(SUMMARY_LIMIT).collect();
        if preview.suggestion.chars().count() > SUMMARY_LIMIT {
            excerpt.push_str("...");
        }
        Some(Applied {
            range: preview.range,
            text: preview.suggestion,
            summary: format!("Applied AI suggestion: \"{}\"", excerpt),
        })
    }

    /// Close the preview from any phase without touching the document.
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TextBuffer;

    fn ready_engine(buffer: &TextBuffer, from: usize, to: usize, suggestion: &str) -> SuggestionEngine {
        let mut engine = SuggestionEngine::new();
        let range = Range::new(from, to);
        let id = engine.begin(buffer.text_in_range(range), range);
        assert!(engine.resolve(id, Ok(suggestion.to_string())));
        engine
    }

    #[test]
    fn test_begin_opens_generating_preview() {
        let mut engine = SuggestionEngine::new();
        engine.begin("The cat sat on the mat.".to_string(), Range::new(0, 23));

        let preview = engine.preview().unwrap();
        assert_eq!(preview.original, "The cat sat on the mat.");
        assert_eq!(preview.phase, PreviewPhase::Generating);
        assert_eq!(preview.display_text(), "");
        assert!(!preview.is_confirmable());
    }

    #[test]
    fn test_confirm_uses_captured_range_not_live_selection() {
        let mut buffer = TextBuffer::from_text("The cat sat on the mat.");
        let mut engine = ready_engine(&buffer, 0, 23, "The cat sat.");

        // The user clicked elsewhere while the suggestion was pending.
        buffer.set_selection(Range::caret(5));

        let applied = engine.confirm(&mut buffer).unwrap();
        assert_eq!(applied.range, Range::new(0, 23));
        assert_eq!(buffer.text(), "The cat sat.");
        assert!(engine.preview().is_none());
    }

    #[test]
    fn test_confirm_summary_ellipsizes_long_suggestions() {
        let long = "x".repeat(150);
        let mut buffer = TextBuffer::from_text("short");
        let mut engine = ready_engine(&buffer, 0, 5, &long);

        let applied = engine.confirm(&mut buffer).unwrap();
        assert_eq!(
            applied.summary,
            format!("Applied AI suggestion: \"{}...\"", "x".repeat(100))
        );
    }

    #[test]
    fn test_confirm_short_suggestion_is_not_ellipsized() {
        let mut buffer = TextBuffer::from_text("The cat sat on the mat.");
        let mut engine = ready_engine(&buffer, 0, 23, "The cat sat.");
        let applied = engine.confirm(&mut buffer).unwrap();
        assert_eq!(applied.summary, "Applied AI suggestion: \"The cat sat.\"");
    }

    #[test]
    fn test_errored_preview_shows_message_and_rejects_confirm() {
        let mut buffer = TextBuffer::from_text("hello world");
        let mut engine = SuggestionEngine::new();
        let id = engine.begin("hello".to_string(), Range::new(0, 5));
        assert!(engine.resolve(id, Err("Error: network down".to_string())));

        let preview = engine.preview().unwrap();
        assert_eq!(preview.display_text(), "Error: network down");
        assert!(!preview.is_confirmable());

        assert!(engine.confirm(&mut buffer).is_none());
        assert_eq!(buffer.text(), "hello world");
        // The errored preview stays open until cancelled.
        assert!(engine.is_open());
    }

    #[test]
    fn test_cancel_never_mutates_document() {
        let mut buffer = TextBuffer::from_text("hello world");
        let mut engine = ready_engine(&buffer, 0, 5, "goodbye");
        assert!(engine.cancel());
        assert_eq!(buffer.text(), "hello world");
        assert!(!engine.is_open());
    }

    #[test]
    fn test_resolution_after_cancel_is_stale() {
        let mut engine = SuggestionEngine::new();
        let id = engine.begin("text".to_string(), Range::new(0, 4));
        engine.cancel();
        assert!(!engine.resolve(id, Ok("late".to_string())));
        assert!(engine.preview().is_none());
    }

    #[test]
    fn test_old_response_cannot_clobber_newer_preview() {
        let mut engine = SuggestionEngine::new();
        let first = engine.begin("first".to_string(), Range::new(0, 5));
        let second = engine.begin("second".to_string(), Range::new(6, 12));

        assert!(!engine.resolve(first, Ok("stale result".to_string())));
        let preview = engine.preview().unwrap();
        assert_eq!(preview.id, second);
        assert_eq!(preview.phase, PreviewPhase::Generating);

        assert!(engine.resolve(second, Ok("fresh result".to_string())));
        assert_eq!(engine.preview().unwrap().suggestion, "fresh result");
    }

    #[test]
    fn test_double_resolution_is_dropped() {
        let mut engine = SuggestionEngine::new();
        let id = engine.begin("text".to_string(), Range::new(0, 4));
        assert!(engine.resolve(id, Ok("first".to_string())));
        assert!(!engine.resolve(id, Ok("second".to_string())));
        assert_eq!(engine.preview().unwrap().suggestion, "first");
    }
}
