use thiserror::Error;

/// Failures surfaced by the assistant service layer.
///
/// A missing credential is its own variant so callers can tell configuration
/// problems apart from transport and service failures.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Google AI API key is not configured. Please add GEMINI_API_KEY to your environment or config file.")]
    MissingApiKey,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Service(String),
}

/// Result type alias for assistant service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
