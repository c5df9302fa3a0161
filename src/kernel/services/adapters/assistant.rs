//! HTTP implementation of [`AssistantBridge`] over a blocking `ureq` agent.

use std::time::Duration;

use crate::kernel::services::ports::{
    AssistantBridge, AssistantError, AssistantSettings, ErrorBody, GenerateRequest,
    GenerateResponse,
};

const FALLBACK_ERROR: &str = "Failed to generate AI response";
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

pub struct HttpAssistant {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpAssistant {
    pub fn new(settings: &AssistantSettings) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_millis(settings.timeout_ms.max(1)))
            .build();
        Self {
            agent,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

impl AssistantBridge for HttpAssistant {
    fn generate(&self, request: &GenerateRequest) -> Result<String, AssistantError> {
        let body = serde_json::to_string(request)
            .map_err(|e| AssistantError::Network(e.to_string()))?;
        let url = self.endpoint("ai/generate");
        tracing::debug!(%url, bytes = body.len(), "assistant request");

        let result = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_string(&body);

        match result {
            Ok(response) => {
                let text = response
                    .into_string()
                    .map_err(|e| AssistantError::Network(e.to_string()))?;
                let parsed: GenerateResponse = serde_json::from_str(&text).map_err(|e| {
                    AssistantError::Service {
                        status: 200,
                        message: format!("malformed response: {e}"),
                        details: None,
                    }
                })?;
                Ok(parsed.response)
            }
            Err(ureq::Error::Status(status, response)) => {
                let body: ErrorBody = response
                    .into_string()
                    .ok()
                    .and_then(|text| serde_json::from_str(&text).ok())
                    .unwrap_or_default();
                tracing::warn!(status, error = ?body.error, "assistant service error");
                Err(AssistantError::Service {
                    status,
                    message: body.error.unwrap_or_else(|| FALLBACK_ERROR.to_string()),
                    details: body.details,
                })
            }
            Err(err) => Err(AssistantError::Network(err.to_string())),
        }
    }

    fn health(&self) -> bool {
        let ok = self
            .agent
            .get(&self.endpoint("health"))
            .timeout(HEALTH_TIMEOUT)
            .call()
            .is_ok_and(|response| response.status() == 200);
        tracing::debug!(ok, base_url = %self.base_url, "assistant health check");
        ok
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/assistant.rs"]
mod tests;
