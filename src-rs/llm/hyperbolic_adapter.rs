use std::collections::HashMap;
use std::error::Error as _;
use std::io;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Proxy;

use super::types::{CompletionRequest, CompletionResponse, CompletionTransport, TransportError, TransportReply};
use crate::pools::ProxyRoute;

const MAX_ERROR_BODY: usize = 512;

/// Posts chat-completion requests with reqwest's blocking client.
///
/// reqwest fixes the proxy when a client is built, so one client is kept per
/// route and created on first use. A proxy URL that reqwest rejects only fails
/// the requests routed through it.
pub struct HttpTransport {
    endpoint_url: String,
    timeout: Duration,
    clients: HashMap<Option<String>, Client>,
}

impl HttpTransport {
    pub fn new(endpoint_url: &str, timeout: Duration) -> Self {
        Self {
            endpoint_url: endpoint_url.to_string(),
            timeout,
            clients: HashMap::new(),
        }
    }

    fn client_for(&mut self, route: &ProxyRoute) -> Result<&Client, TransportError> {
        let key = route.url().map(str::to_string);
        if !self.clients.contains_key(&key) {
            let client = build_client(self.timeout, route)?;
            self.clients.insert(key.clone(), client);
        }
        self.clients
            .get(&key)
            .ok_or_else(|| TransportError::Client("client cache miss".to_string()))
    }
}

impl CompletionTransport for HttpTransport {
    fn send(
        &mut self,
        request: &CompletionRequest,
        api_key: &str,
        route: &ProxyRoute,
    ) -> Result<TransportReply, TransportError> {
        let endpoint = self.endpoint_url.clone();
        let client = self.client_for(route)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| TransportError::Request("api key is not a valid header value".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);

        let resp = client
            .post(endpoint)
            .headers(headers)
            .json(request)
            .send()
            .map_err(classify)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY),
            });
        }

        // The reply only counts once the whole body arrived within the timeout.
        let body = resp.text().map_err(classify)?;

        let content = serde_json::from_str::<CompletionResponse>(&body)
            .ok()
            .and_then(|parsed| parsed.first_content().map(str::to_string));
        Ok(TransportReply {
            status: status.as_u16(),
            content,
        })
    }
}

fn build_client(timeout: Duration, route: &ProxyRoute) -> Result<Client, TransportError> {
    let mut builder = Client::builder().timeout(timeout);
    builder = match route {
        ProxyRoute::Direct => builder.no_proxy(),
        ProxyRoute::Via(endpoint) => {
            let proxy = Proxy::all(endpoint.url.as_str()).map_err(|err| TransportError::Proxy {
                url: endpoint.url.clone(),
                message: err.to_string(),
            })?;
            builder.proxy(proxy)
        }
    };
    builder
        .build()
        .map_err(|err| TransportError::Client(err.to_string()))
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() || timed_out_io(&err) {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}

fn timed_out_io(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::TimedOut {
                return true;
            }
        }
        source = cause.source();
    }
    false
}

fn truncate(body: &str, limit: usize) -> String {
    match body.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
