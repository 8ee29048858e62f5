//! OpenAI-compatible chat completions client
//!
//! Works with OpenAI, Azure OpenAI, vLLM, Ollama's `/v1` endpoint and other
//! servers speaking the same API.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::TranslateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Sampling options for a completion
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat completions client
#[derive(Debug, Clone)]
pub struct ChatClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl ChatClient {
    /// Create a client with the given request timeout
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranslateError::Unavailable(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the endpoint is reachable and accepts the key
    pub async fn health_check(&self) -> Result<(), TranslateError> {
        let url = format!("{}/models", self.base_url);

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| request_error(&url, e))?;

        let status = resp.status().as_u16();
        if resp.status().is_success() {
            Ok(())
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(classify_status(status, &body))
        }
    }

    /// Send a non-streaming completion and return the reply text
    pub async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<String, TranslateError> {
        let url = format!("{}/chat/completions", self.base_url);

        let req = ChatRequest {
            model,
            messages,
            temperature: options.temperature,
            stream: false,
        };

        tracing::debug!(model, messages = messages.len(), "Sending chat completion");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .map_err(|e| request_error(&url, e))?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let body: ChatResponse = resp
            .json()
            .await
            .map_err(|e| TranslateError::Failed(format!("invalid completion response: {e}")))?;

        first_choice_content(body)
    }
}

fn request_error(url: &str, err: reqwest::Error) -> TranslateError {
    if err.is_connect() {
        TranslateError::Unavailable(format!("cannot reach {url}: {err}"))
    } else if err.is_timeout() {
        TranslateError::Failed(format!("request to {url} timed out"))
    } else {
        TranslateError::Failed(format!("request to {url} failed: {err}"))
    }
}

/// Map a non-success HTTP status to an error class
fn classify_status(status: u16, body: &str) -> TranslateError {
    let detail = body.chars().take(200).collect::<String>();
    match status {
        401 | 403 => TranslateError::Unavailable(format!("authentication rejected ({status}): {detail}")),
        404 => TranslateError::Unavailable(format!("endpoint or model not found ({status}): {detail}")),
        _ => TranslateError::Failed(format!("API error ({status}): {detail}")),
    }
}

fn first_choice_content(body: ChatResponse) -> Result<String, TranslateError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| TranslateError::Failed("no content in completion response".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let messages = vec![ChatMessage::system("Translate"), ChatMessage::user("hello")];
        let req = ChatRequest {
            model: "gpt-4o-mini",
            messages: &messages,
            temperature: None,
            stream: false,
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert!(json.get("temperature").is_none());
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_parse_completion() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"nube nómina"},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice_content(body).unwrap(), "nube nómina");
    }

    #[test]
    fn test_parse_completion_without_choices() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            first_choice_content(body),
            Err(TranslateError::Failed(_))
        ));
    }

    #[test]
    fn test_classify_status() {
        assert!(classify_status(401, "bad key").is_fatal());
        assert!(classify_status(403, "").is_fatal());
        assert!(!classify_status(500, "oops").is_fatal());
        assert!(!classify_status(429, "slow down").is_fatal());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ChatClient::new("http://localhost:8080/v1/", "k", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/v1");
    }

    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn complete_against(server: &MockServer) -> Result<String, TranslateError> {
        let client = ChatClient::new(format!("{}/v1", server.uri()), "test-key", Duration::from_secs(5)).unwrap();
        client
            .complete("gpt-4o-mini", &[ChatMessage::user("hello")], &ChatOptions::default())
            .await
    }

    #[tokio::test]
    async fn test_complete_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "hola"}}]
            })))
            .mount(&server)
            .await;

        assert_eq!(complete_against(&server).await.unwrap(), "hola");
    }

    #[tokio::test]
    async fn test_complete_unauthorized_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let err = complete_against(&server).await.unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_complete_server_error_is_recoverable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let err = complete_against(&server).await.unwrap_err();
        assert!(matches!(err, TranslateError::Failed(_)));
        assert!(err.to_string().contains("upstream exploded"));
    }

    #[tokio::test]
    async fn test_complete_malformed_body_is_recoverable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = complete_against(&server).await.unwrap_err();
        assert!(matches!(err, TranslateError::Failed(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_unavailable() {
        let client = ChatClient::new("http://127.0.0.1:9/v1", "k", Duration::from_secs(5)).unwrap();
        let err = client
            .complete("gpt-4o-mini", &[ChatMessage::user("hello")], &ChatOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_fatal(), "expected Unavailable, got {err:?}");
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
            .mount(&server)
            .await;

        let client = ChatClient::new(format!("{}/v1", server.uri()), "k", Duration::from_secs(5)).unwrap();
        assert!(client.health_check().await.is_ok());
    }
}
