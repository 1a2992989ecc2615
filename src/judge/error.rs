use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
/// Errors returned by a [`JudgmentService`](super::JudgmentService).
pub enum JudgeError {
    /// Provider rejected the call for exceeding its rate limit (HTTP 429).
    #[error("judgment service throttled: {message}")]
    Throttled { message: String },

    /// Transport or provider failure other than throttling.
    #[error("judgment service request failed: {message}")]
    Provider { message: String },

    /// Provider answered without any text.
    #[error("judgment service returned an empty response")]
    EmptyResponse,

    /// Response text was not the JSON shape the caller expected.
    #[error("malformed judgment response: {reason}")]
    Malformed { reason: String },
}

impl JudgeError {
    /// Classifies a provider error message, mapping rate-limit signals to [`JudgeError::Throttled`].
    pub fn from_provider_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if is_throttling_message(&message) {
            JudgeError::Throttled { message }
        } else {
            JudgeError::Provider { message }
        }
    }

    /// Only throttling is worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, JudgeError::Throttled { .. })
    }
}

/// Returns `true` when a provider error message signals throttling.
pub fn is_throttling_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("429") || lower.contains("too many requests") || lower.contains("rate limit")
}
