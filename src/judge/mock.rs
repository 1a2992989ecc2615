use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::JudgmentService;
use super::error::JudgeError;
use super::lexical::LexicalJudge;

#[derive(Debug, Clone, PartialEq)]
/// A recorded call to [`MockJudge`].
pub struct JudgeCall {
    pub system: String,
    pub user: String,
}

/// Scripted judgment service for tests.
///
/// Scripted responses are consumed in order; once the script is empty every call is
/// answered by [`LexicalJudge`]. All calls are recorded.
#[derive(Debug, Default)]
pub struct MockJudge {
    script: Mutex<VecDeque<Result<String, JudgeError>>>,
    calls: Mutex<Vec<JudgeCall>>,
    fallback: LexicalJudge,
}

impl MockJudge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.script.lock().push_back(Ok(response.into()));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: JudgeError) -> Self {
        self.script.lock().push_back(Err(error));
        self
    }

    pub fn push_response(&self, response: impl Into<String>) {
        self.script.lock().push_back(Ok(response.into()));
    }

    pub fn push_error(&self, error: JudgeError) {
        self.script.lock().push_back(Err(error));
    }

    pub fn calls(&self) -> Vec<JudgeCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Number of calls made with the given system prompt.
    pub fn calls_with_system(&self, system: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.system == system)
            .count()
    }
}

#[async_trait]
impl JudgmentService for MockJudge {
    async fn complete(&self, system: &str, user: &str) -> Result<String, JudgeError> {
        self.calls.lock().push(JudgeCall {
            system: system.to_string(),
            user: user.to_string(),
        });

        let scripted = self.script.lock().pop_front();
        match scripted {
            Some(result) => result,
            None => self.fallback.respond(system, user),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
