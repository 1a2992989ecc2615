//! External judgment service (hosted language model) and the retry wrapper around it.

pub mod error;
pub mod hosted;
pub mod lexical;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod prompts;
pub mod retry;

pub use error::{JudgeError, is_throttling_message};
pub use hosted::GenaiJudge;
pub use lexical::LexicalJudge;
#[cfg(any(test, feature = "mock"))]
pub use mock::{JudgeCall, MockJudge};
pub use retry::{DEFAULT_BACKOFF_BASE, RetryPolicy};

use async_trait::async_trait;

#[async_trait]
/// Chat-style completion: one system prompt, one user message, text back.
pub trait JudgmentService: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, JudgeError>;

    /// Short label for logs.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttling_detection() {
        assert!(is_throttling_message("HTTP status 429"));
        assert!(is_throttling_message("Too Many Requests"));
        assert!(is_throttling_message("rate limit exceeded for model"));
        assert!(!is_throttling_message("connection reset by peer"));
    }

    #[test]
    fn test_from_provider_message() {
        assert!(JudgeError::from_provider_message("status 429").is_retryable());
        assert!(!JudgeError::from_provider_message("status 500").is_retryable());
        assert!(
            !JudgeError::Malformed {
                reason: "x".to_string()
            }
            .is_retryable()
        );
    }

    #[tokio::test]
    async fn test_mock_judge_script_then_fallback() {
        let judge = MockJudge::new()
            .with_response("first")
            .with_error(JudgeError::EmptyResponse);

        assert_eq!(judge.complete("s", "u").await.unwrap(), "first");
        assert_eq!(
            judge.complete("s", "u").await,
            Err(JudgeError::EmptyResponse)
        );
        assert_eq!(
            judge.complete("s", "hello").await.unwrap(),
            "Mock response for: hello"
        );
        assert_eq!(judge.call_count(), 3);
        assert_eq!(judge.calls_with_system("s"), 3);
    }

    #[test]
    fn test_genai_judge_debug_hides_client() {
        let judge = GenaiJudge::new("mistral-small-latest");
        assert_eq!(judge.model(), "mistral-small-latest");
        assert!(format!("{:?}", judge).contains("mistral-small-latest"));
    }
}
