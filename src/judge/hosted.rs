use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use tracing::{debug, error};

use super::JudgmentService;
use super::error::JudgeError;

/// Judgment service backed by a hosted chat model via `genai`.
#[derive(Clone)]
pub struct GenaiJudge {
    client: Client,
    model: String,
}

impl std::fmt::Debug for GenaiJudge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiJudge")
            .field("model", &self.model)
            .finish()
    }
}

impl GenaiJudge {
    /// Uses the default `genai` client (provider keys come from the environment).
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_client(Client::default(), model)
    }

    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl JudgmentService for GenaiJudge {
    async fn complete(&self, system: &str, user: &str) -> Result<String, JudgeError> {
        let request = ChatRequest::new(vec![ChatMessage::system(system), ChatMessage::user(user)]);
        let options = ChatOptions::default().with_temperature(0.0);

        debug!(model = %self.model, user_len = user.len(), "Calling judgment model");

        let response = self
            .client
            .exec_chat(&self.model, request, Some(&options))
            .await
            .map_err(|e| {
                error!(model = %self.model, "Provider error: {}", e);
                JudgeError::from_provider_message(e.to_string())
            })?;

        response
            .first_text()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .ok_or(JudgeError::EmptyResponse)
    }

    fn name(&self) -> &str {
        &self.model
    }
}
