use tracing::debug;

use crate::document::{DocumentModel, Point, Range};

/// A selection snapshot taken when the user picks a toolbar action.
/// The range is immutable from here on; it is the span the eventual
/// suggestion will replace, whatever the live selection does meanwhile.
#[derive(Debug, Clone)]
pub struct Capture {
    pub range: Range,
    pub text: String,
}

/// Tracks the live selection and derives the floating-toolbar anchor.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    anchor: Option<Point>,
    selected_text: String,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor for the floating toolbar; `None` hides it.
    pub fn anchor(&self) -> Option<Point> {
        self.anchor
    }

    pub fn selected_text(&self) -> &str {
        &self.selected_text
    }

    /// Called on every selection-changed notification from the document.
    pub fn on_selection_changed(&mut self, doc: &impl DocumentModel) {
        let selection = doc.current_selection();
        if selection.is_empty() {
            self.anchor = None;
            self.selected_text.clear();
            return;
        }
        self.selected_text = doc.text_in_range(selection);
        self.anchor = Some(doc.coords_at(selection.from));
    }

    /// Snapshot the live selection for an edit request.
    ///
    /// Only succeeds while the toolbar is showing over a non-empty selection.
    /// Clears the anchor on dispatch: the toolbar disappears as soon as an
    /// action is chosen, before the remote call resolves.
    pub fn capture(&mut self, doc: &impl DocumentModel) -> Option<Capture> {
        self.anchor?;
        let range = doc.current_selection();
        if range.is_empty() {
            return None;
        }
        let text = doc.text_in_range(range);
        if text.is_empty() {
            return None;
        }
        self.anchor = None;
        debug!(from = range.from, to = range.to, "captured selection for edit");
        Some(Capture { range, text })
    }

    pub fn clear_anchor(&mut self) {
        self.anchor = None;
    }
}
