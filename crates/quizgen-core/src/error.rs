//! Error types for the quiz pipeline.
//!
//! Provider, parse, and store failures are data-path errors: each is
//! reported per generation attempt and wrapped in [`GenerationError`] at the
//! engine boundary. [`SessionError`] signals a caller contract violation.

use thiserror::Error;

use crate::session::SessionPhase;

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited by provider")]
    RateLimited,

    /// Authentication failed (missing or invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// The response was well-formed but carried no text.
    #[error("provider returned no text content: {0}")]
    EmptyResponse(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// Why a single question record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` has the wrong type, expected {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("question text is empty")]
    EmptyPrompt,

    #[error("expected exactly 4 choices, found {0}")]
    ChoiceCount(usize),

    #[error("choice {0} is empty")]
    EmptyChoice(usize),

    #[error("choices {0} and {1} are identical")]
    DuplicateChoice(usize, usize),

    #[error("correct choice {0} is out of range")]
    AnswerOutOfRange(i64),

    #[error("translation is empty")]
    EmptyTranslation,

    #[error("explanation is empty")]
    EmptyExplanation,
}

/// The model output violates the agreed schema. No partial set is produced.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("response is not a JSON array of questions")]
    NotAnArray,

    #[error("response contains no questions")]
    NoQuestions,

    #[error("question {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// Persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("stored row {row_id} is corrupt: {reason}")]
    Corrupt { row_id: i64, reason: String },

    #[error("refusing to store an empty question set")]
    EmptySet,

    #[error("refusing to store invalid question {index}: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// Session operations called out of order, or with bad arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot start a session with an empty question set")]
    EmptySet,

    #[error("`{operation}` is not valid in state {actual}, expected {}", format_phases(.expected))]
    InvalidState {
        operation: &'static str,
        expected: &'static [SessionPhase],
        actual: SessionPhase,
    },

    #[error("choice index {0} is out of range, expected 0-3")]
    ChoiceOutOfRange(usize),
}

fn format_phases(phases: &[SessionPhase]) -> String {
    phases
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" or ")
}

/// A failed generation cycle. The stored set and the active session are
/// left exactly as they were before the attempt.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("question generation failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("generated questions were rejected: {0}")]
    Parse(#[from] ParseError),

    #[error("could not save generated questions: {0}")]
    Store(#[from] StoreError),
}
