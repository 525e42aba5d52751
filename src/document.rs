//! The document seam.
//!
//! The editing surface itself lives outside this crate. Anything that can
//! report a selection, hand back text for a range, and replace a range
//! satisfies [`DocumentModel`] and can drive the suggestion workflow.
//! [`TextBuffer`] is the reference implementation used by tests and by hosts
//! that keep the document as plain text.

/// A contiguous span of document text, as byte offsets into the document.
///
/// Invariant: `from <= to`. Offsets always sit on `char` boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub from: usize,
    pub to: usize,
}

impl Range {
    /// Build a range, swapping the endpoints if they arrive reversed.
    pub fn new(from: usize, to: usize) -> Self {
        if from <= to {
            Self { from, to }
        } else {
            Self { from: to, to: from }
        }
    }

    /// A collapsed range (caret) at `pos`.
    pub fn caret(pos: usize) -> Self {
        Self { from: pos, to: pos }
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }
}

/// Screen-space coordinate used to anchor the floating action toolbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Capability interface over the host's editing surface.
pub trait DocumentModel {
    /// The current selection; collapsed when nothing is selected.
    fn current_selection(&self) -> Range;

    /// Move the selection. Implementations clamp out-of-bounds offsets.
    fn set_selection(&mut self, range: Range);

    /// Text covered by `range`.
    fn text_in_range(&self, range: Range) -> String;

    /// Replace `range` with `content` as one atomic edit (one undo step).
    /// Afterwards the selection is a caret just past the inserted content.
    fn replace_range(&mut self, range: Range, content: &str);

    /// Offset of the end of the document.
    fn end(&self) -> usize;

    /// Screen coordinate of the character at `pos`.
    fn coords_at(&self, pos: usize) -> Point;
}

// Synthetic glyph metrics for the plain-text buffer. Hosts with a real
// layout engine report their own coordinates.
const CHAR_WIDTH: f64 = 8.0;
const LINE_HEIGHT: f64 = 16.0;

/// Plain-text document with a tracked selection.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    text: String,
    selection: Range,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            selection: Range::caret(0),
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            selection: Range::caret(0),
        }
    }

    /// The welcome document every fresh session starts from.
    pub fn seeded() -> Self {
        Self::from_text(SEED_TEMPLATE)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Clamp an offset into the buffer, snapping down to a char boundary.
    fn clamp(&self, pos: usize) -> usize {
        let mut pos = pos.min(self.text.len());
        while pos > 0 && !self.text.is_char_boundary(pos) {
            pos -= 1;
        }
        pos
    }

    fn clamp_range(&self, range: Range) -> Range {
        Range::new(self.clamp(range.from), self.clamp(range.to))
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentModel for TextBuffer {
    fn current_selection(&self) -> Range {
        self.selection
    }

    fn set_selection(&mut self, range: Range) {
        self.selection = self.clamp_range(range);
    }

    fn text_in_range(&self, range: Range) -> String {
        let range = self.clamp_range(range);
        self.text[range.from..range.to].to_string()
    }

    fn replace_range(&mut self, range: Range, content: &str) {
        let range = self.clamp_range(range);
        self.text.replace_range(range.from..range.to, content);
        self.selection = Range::caret(range.from + content.len());
    }

    fn end(&self) -> usize {
        self.text.len()
    }

    fn coords_at(&self, pos: usize) -> Point {
        let pos = self.clamp(pos);
        let before = &self.text[..pos];
        let line = before.matches('\n').count();
        let column = before
            .rsplit('\n')
            .next()
            .map(|l| l.chars().count())
            .unwrap_or(0);
        Point {
            x: column as f64 * CHAR_WIDTH,
            y: line as f64 * LINE_HEIGHT,
        }
    }
}

const SEED_TEMPLATE: &str = "\
Welcome to the AI-Powered Collaborative Editor

This is a modern text editor with advanced AI integration. Here are some features to try:

- Select any text to see the floating toolbar with AI editing options
- Use the chat sidebar to interact with the AI assistant
- Ask the AI to search the web and insert information directly into your document
- Request specific text improvements like \"make this more professional\" or \"shorten this paragraph\"

Try asking: \"Search for the latest developments in AI and insert a summary here\" or select this paragraph and use the floating toolbar!

Example Commands:

- \"Find the latest news about Next.js 15 and insert it below\"
- \"Search for React best practices and add them to this document\"
- \"What are the current trends in web development?\"
";
