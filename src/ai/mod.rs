pub mod gemini;

pub use gemini::{GeminiClient, GeminiFunctionCall, GeminiReply};
