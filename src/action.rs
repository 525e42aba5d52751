use serde::{Deserialize, Serialize};

/// The editing actions offered by the floating toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditAction {
    #[default]
    Edit,
    Improve,
    Shorten,
    Expand,
    Professional,
    Casual,
}

impl EditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditAction::Edit => "edit",
            EditAction::Improve => "improve",
            EditAction::Shorten => "shorten",
            EditAction::Expand => "expand",
            EditAction::Professional => "professional",
            EditAction::Casual => "casual",
        }
    }

    /// Parse an action string. Unknown strings fall back to `Edit`.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "edit" => EditAction::Edit,
            "improve" => EditAction::Improve,
            "shorten" => EditAction::Shorten,
            "expand" => EditAction::Expand,
            "professional" => EditAction::Professional,
            "casual" => EditAction::Casual,
            _ => EditAction::Edit,
        }
    }

    pub fn all() -> Vec<EditAction> {
        vec![
            EditAction::Edit,
            EditAction::Improve,
            EditAction::Shorten,
            EditAction::Expand,
            EditAction::Professional,
            EditAction::Casual,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EditAction::Edit => "Edit with AI",
            EditAction::Improve => "Improve",
            EditAction::Shorten => "Shorten",
            EditAction::Expand => "Expand",
            EditAction::Professional => "Make Professional",
            EditAction::Casual => "Make Casual",
        }
    }

    /// The instruction sent to the text model, with the original embedded.
    pub fn instruction(&self, text: &str) -> String {
        match self {
            EditAction::Edit => format!(
                "Please improve and edit this text while maintaining its core meaning. Make it more clear, concise, and engaging: \"{}\"",
                text
            ),
            EditAction::Improve => format!(
                "Please enhance this text by improving its vocabulary, flow, and overall quality while keeping the same message: \"{}\"",
                text
            ),
            EditAction::Shorten => format!(
                "Please make this text more concise while preserving all important information: \"{}\"",
                text
            ),
            EditAction::Expand => format!(
                "Please expand on this text with more detail and context: \"{}\"",
                text
            ),
            EditAction::Professional => format!(
                "Please rewrite this text in a more professional tone: \"{}\"",
                text
            ),
            EditAction::Casual => format!(
                "Please rewrite this text in a more casual, friendly tone: \"{}\"",
                text
            ),
        }
    }
}
