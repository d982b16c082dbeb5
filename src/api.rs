use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/chat";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Why a send produced no reply. Both variants are terminal for the message
/// that triggered them; the widget renders them as an AI row prefixed with
/// "Error: " and the user may resubmit manually.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// The server answered non-2xx with a decoded reason.
    #[error("{0}")]
    Api(String),
    /// The request never produced a usable response.
    #[error("{0}")]
    Transport(String),
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ReplyBody {
    reply: Option<Value>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl ChatClient {
    pub fn new(endpoint: &str, timeout_secs: u64) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// POSTs `{"message": ...}` to the chat endpoint and decodes the outcome.
    /// Exactly one request per call; the timeout keeps a hung server from
    /// holding the widget busy forever.
    pub async fn send(&self, message: &str) -> Result<String, SendError> {
        debug!("POST {} ({} chars)", self.endpoint, message.chars().count());

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|e| SendError::Transport(transport_message(&e)))?;

        let status = response.status();
        if !status.is_success() {
            warn!("chat endpoint returned {}", status);
            let body = response
                .text()
                .await
                .map_err(|e| SendError::Transport(transport_message(&e)))?;
            return Err(SendError::Api(decode_error_body(&body)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SendError::Transport(transport_message(&e)))?;
        decode_reply(&body)
    }
}

/// Success bodies look like `{"reply": "..."}`. A missing or null `reply`
/// falls back to a fixed string; any other JSON value is coerced to text.
/// A 2xx body that is not JSON at all counts as a transport failure.
fn decode_reply(body: &str) -> Result<String, SendError> {
    let parsed: ReplyBody =
        serde_json::from_str(body).map_err(|e| SendError::Transport(e.to_string()))?;

    Ok(match parsed.reply {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => "No response.".to_string(),
        Some(other) => other.to_string(),
    })
}

/// Error bodies optionally look like `{"error": "..."}`. Anything else is
/// downgraded to a generic message rather than escalated.
fn decode_error_body(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| "Something went wrong.".to_string())
}

fn transport_message(err: &reqwest::Error) -> String {
    let msg = err.to_string();
    if msg.is_empty() {
        "Network error.".to_string()
    } else {
        msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn reply_string_is_returned_verbatim() {
        assert_eq!(decode_reply(r#"{"reply":"Hi there"}"#).unwrap(), "Hi there");
    }

    #[test]
    fn missing_or_null_reply_falls_back() {
        assert_eq!(decode_reply("{}").unwrap(), "No response.");
        assert_eq!(decode_reply(r#"{"reply":null}"#).unwrap(), "No response.");
    }

    #[test]
    fn non_string_reply_is_coerced() {
        assert_eq!(decode_reply(r#"{"reply":42}"#).unwrap(), "42");
        assert_eq!(decode_reply(r#"{"reply":true}"#).unwrap(), "true");
    }

    #[test]
    fn unparseable_success_body_is_a_transport_error() {
        assert!(matches!(
            decode_reply("not json"),
            Err(SendError::Transport(_))
        ));
    }

    #[test]
    fn structured_error_body_yields_its_reason() {
        assert_eq!(decode_error_body(r#"{"error":"rate limited"}"#), "rate limited");
    }

    #[test]
    fn malformed_error_body_is_downgraded() {
        assert_eq!(decode_error_body("<html>oops</html>"), "Something went wrong.");
        assert_eq!(decode_error_body(r#"{"detail":"nope"}"#), "Something went wrong.");
        assert_eq!(decode_error_body(""), "Something went wrong.");
    }

    fn mock_endpoint(server: &MockServer) -> ChatClient {
        ChatClient::new(&format!("{}/api/chat", server.uri()), 5)
    }

    #[tokio::test]
    async fn send_posts_json_with_the_expected_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"message": "Hello"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "Hi there"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = mock_endpoint(&server);
        assert_eq!(client.send("Hello").await.unwrap(), "Hi there");
    }

    #[tokio::test]
    async fn http_error_with_reason_becomes_an_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"error": "rate limited"})),
            )
            .mount(&server)
            .await;

        let client = mock_endpoint(&server);
        assert_eq!(
            client.send("test").await,
            Err(SendError::Api("rate limited".to_string()))
        );
    }

    #[tokio::test]
    async fn http_error_with_garbage_body_is_generic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let client = mock_endpoint(&server);
        assert_eq!(
            client.send("test").await,
            Err(SendError::Api("Something went wrong.".to_string()))
        );
    }

    #[tokio::test]
    async fn empty_success_body_reports_no_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = mock_endpoint(&server);
        assert_eq!(client.send("test").await.unwrap(), "No response.");
    }

    #[tokio::test]
    async fn connection_refused_is_a_transport_error() {
        // Port 9 (discard) is never serving HTTP.
        let client = ChatClient::new("http://127.0.0.1:9/api/chat", 5);
        assert!(matches!(
            client.send("test").await,
            Err(SendError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn slow_server_hits_the_request_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"reply": "too late"}))
                    .set_delay(Duration::from_secs(10)),
            )
            .mount(&server)
            .await;

        let client = ChatClient::new(&format!("{}/api/chat", server.uri()), 1);
        assert!(matches!(
            client.send("test").await,
            Err(SendError::Transport(_))
        ));
    }
}
