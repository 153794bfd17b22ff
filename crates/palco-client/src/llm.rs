use std::time::Duration;

use palco_core::error::ScrapeError;
use palco_core::traits::ModelClient;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// OpenAI-compatible chat-completion client.
///
/// Works with any OpenAI-compatible API, including Gemini's compatibility
/// layer. One synchronous call per pipeline invocation, no retry — callers
/// that need resilience retry the whole pipeline. The raw assistant text
/// is returned untouched; parsing and validation happen in `palco-core`.
#[derive(Clone)]
pub struct OpenAiModelClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiModelClient {
    pub fn new(api_key: &str, model: &str) -> Result<Self, ScrapeError> {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, model: &str, base_url: &str) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| ScrapeError::ModelCall(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

// ---- OpenAI API types ----

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl ModelClient for OpenAiModelClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ScrapeError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| ScrapeError::ModelCall(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body);
            return Err(ScrapeError::ModelCall(format!(
                "HTTP {status_code}: {message}"
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ScrapeError::ModelCall(format!("failed to decode response: {e}")))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ScrapeError::ModelCall("empty response from model".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client =
            OpenAiModelClient::with_base_url("key", "gpt-4o-mini", "https://llm.example.com/v1/")
                .unwrap();
        assert_eq!(client.base_url, "https://llm.example.com/v1");
    }

    #[test]
    fn test_request_serializes_both_roles() {
        let request = ChatRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![
                Message {
                    role: "system".into(),
                    content: "regras".into(),
                },
                Message {
                    role: "user".into(),
                    content: "conteúdo".into(),
                },
            ],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["model"], "gpt-4o-mini");
    }
}
