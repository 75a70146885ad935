use serde::{Deserialize, Serialize};

use crate::pools::ProxyRoute;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// Body of one chat-completions call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Choice {
    pub message: Option<Message>,
}

impl CompletionResponse {
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .map(|msg| msg.content.as_str())
    }
}

/// What came back from an accepted request.
#[derive(Clone, Debug, PartialEq)]
pub struct TransportReply {
    pub status: u16,
    pub content: Option<String>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("invalid proxy {url}: {message}")]
    Proxy { url: String, message: String },

    #[error("http {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Request(String),

    #[error("http client unavailable: {0}")]
    Client(String),
}

impl TransportError {
    pub fn code(&self) -> &'static str {
        match self {
            TransportError::Timeout(_) => "timeout",
            TransportError::Connect(_) => "network_error",
            TransportError::Proxy { .. } => "proxy_error",
            TransportError::Status { status, .. } if *status >= 500 => "server_error",
            TransportError::Status { status, .. } if *status == 401 || *status == 403 => "auth_error",
            TransportError::Status { status, .. } if *status == 429 => "rate_limit",
            TransportError::Status { .. } => "api_error",
            TransportError::Request(_) => "request_error",
            TransportError::Client(_) => "client_error",
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Sends one completion request; exactly one attempt per call.
pub trait CompletionTransport: Send {
    fn send(
        &mut self,
        request: &CompletionRequest,
        api_key: &str,
        route: &ProxyRoute,
    ) -> Result<TransportReply, TransportError>;
}
