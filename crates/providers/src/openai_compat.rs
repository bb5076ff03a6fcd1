//! Client for the OpenAI chat-completions wire format.
//!
//! Any endpoint that serves `POST {base}/chat/completions` and
//! `GET {base}/models` in that format can be used, local servers included.

use async_trait::async_trait;
use parley_core::error::ProviderError;
use parley_core::message::{Message, Role};
use parley_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// A completion provider speaking the OpenAI chat-completions protocol.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let name = name.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("{name}: {e}")))?;

        Ok(Self {
            name,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn map_send_error(e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(e.to_string())
        } else {
            ProviderError::Network(e.to_string())
        }
    }
}

/// The error for a non-success HTTP status, `None` for 200.
fn status_error(status: u16, body: String) -> Option<ProviderError> {
    match status {
        200 => None,
        429 => Some(ProviderError::RateLimited { retry_after_secs: 5 }),
        401 | 403 => Some(ProviderError::AuthenticationFailed(
            "API key rejected by the completion service".into(),
        )),
        _ => Some(ProviderError::ApiError {
            status_code: status,
            message: body,
        }),
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let body = CompletionBody::new(&request);

        debug!(provider = %self.name, model = %request.model, "Sending completion request");

        let reply = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = reply.status().as_u16();
        if status != 200 {
            let text = reply.text().await.unwrap_or_default();
            warn!(status, body = %text, "Completion service returned an error");
            return Err(status_error(status, text).unwrap_or(ProviderError::EmptyResponse));
        }

        let completion: Completion = reply.json().await.map_err(|e| ProviderError::ApiError {
            status_code: status,
            message: format!("Undecodable completion body: {e}"),
        })?;

        first_choice(completion)
    }

    /// Lists models; any success status means the key and endpoint work.
    async fn health_check(&self) -> Result<bool, ProviderError> {
        self.client
            .get(self.endpoint("models"))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map(|listing| listing.status().is_success())
            .map_err(Self::map_send_error)
    }
}

/// Keep the first choice; a body without choices is an error.
fn first_choice(completion: Completion) -> Result<ProviderResponse, ProviderError> {
    let Some(choice) = completion.choices.into_iter().next() else {
        return Err(ProviderError::EmptyResponse);
    };

    Ok(ProviderResponse {
        message: Message::assistant(choice.message.content.unwrap_or_default()),
        usage: completion.usage,
        model: completion.model,
    })
}

// Wire types. Outgoing messages borrow from the request.

#[derive(Debug, Serialize)]
struct OutgoingMessage<'a> {
    role: &'a Role,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: Vec<OutgoingMessage<'a>>,
    n: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> CompletionBody<'a> {
    fn new(request: &'a ProviderRequest) -> Self {
        Self {
            model: &request.model,
            messages: request
                .messages
                .iter()
                .map(|m| OutgoingMessage {
                    role: &m.role,
                    content: &m.content,
                })
                .collect(),
            n: request.n,
            max_tokens: request.max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Completion {
    model: String,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let provider = OpenAiCompatProvider::new(
            "custom",
            "http://localhost:8000/v1/",
            "k",
            Duration::from_secs(30),
        )
        .unwrap();
        assert_eq!(provider.name(), "custom");
        assert_eq!(provider.base_url(), "http://localhost:8000/v1");
        assert_eq!(provider.endpoint("models"), "http://localhost:8000/v1/models");
    }

    #[test]
    fn status_mapping() {
        assert!(status_error(200, String::new()).is_none());
        assert!(matches!(
            status_error(429, String::new()),
            Some(ProviderError::RateLimited { .. })
        ));
        assert!(matches!(
            status_error(401, String::new()),
            Some(ProviderError::AuthenticationFailed(_))
        ));
        assert!(matches!(
            status_error(403, String::new()),
            Some(ProviderError::AuthenticationFailed(_))
        ));
        match status_error(500, "boom".into()) {
            Some(ProviderError::ApiError { status_code, message }) => {
                assert_eq!(status_code, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    fn request(max_tokens: Option<u32>) -> ProviderRequest {
        ProviderRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![Message::system("You are a cat"), Message::user("Hello")],
            max_tokens,
            n: 1,
        }
    }

    #[test]
    fn request_body_omits_unset_max_tokens() {
        let unlimited = request(None);
        let json = serde_json::to_value(CompletionBody::new(&unlimited)).unwrap();
        assert!(json.get("max_tokens").is_none());
        assert_eq!(json["n"], 1);
        assert_eq!(json["model"], "gpt-4o-mini");

        let limited = request(Some(50));
        assert_eq!(serde_json::to_value(CompletionBody::new(&limited)).unwrap()["max_tokens"], 50);
    }

    #[test]
    fn messages_go_out_with_lowercase_roles() {
        let req = request(None);
        let json = serde_json::to_value(CompletionBody::new(&req)).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "You are a cat");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Hello");
    }

    #[test]
    fn first_of_several_choices_wins() {
        let data = r#"{
            "model": "gpt-4o-mini",
            "choices": [
                {"message": {"role": "assistant", "content": "Meow!"}},
                {"message": {"role": "assistant", "content": "Purr."}}
            ],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        }"#;
        let completion: Completion = serde_json::from_str(data).unwrap();
        let response = first_choice(completion).unwrap();
        assert_eq!(response.message.content, "Meow!");
        assert_eq!(response.message.role, Role::Assistant);
        assert_eq!(response.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn no_choices_is_an_error() {
        let data = r#"{"model": "gpt-4o-mini", "choices": []}"#;
        let completion: Completion = serde_json::from_str(data).unwrap();
        assert!(matches!(first_choice(completion), Err(ProviderError::EmptyResponse)));
    }

    #[test]
    fn null_content_becomes_empty_text() {
        let data = r#"{"model": "m", "choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let completion: Completion = serde_json::from_str(data).unwrap();
        assert_eq!(first_choice(completion).unwrap().message.content, "");
    }
}
