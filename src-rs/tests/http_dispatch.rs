//! Dispatcher + HttpTransport against a local mock endpoint.
//!
//! The blocking reqwest client must not be created or dropped on an async
//! worker, so under tokio every dispatcher lives inside `spawn_blocking`.
//! The raw-socket test needs no runtime and calls the dispatcher directly.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use prompt_relay_rs::llm::HttpTransport;
use prompt_relay_rs::{
    CredentialRotator, DispatchConfig, DispatchOutcome, Dispatcher, ProxyRotator, QuestionSequence,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn build(endpoint: &str, keys: &[&str], proxies: &[&str], timeout: Duration) -> Dispatcher {
    let config = DispatchConfig {
        endpoint_url: endpoint.to_string(),
        model: "test-model".to_string(),
        max_tokens: 32,
        delay: Duration::ZERO,
        request_timeout: timeout,
        ..DispatchConfig::default()
    };
    Dispatcher::new(
        config.clone(),
        CredentialRotator::new(strings(keys)).unwrap(),
        ProxyRotator::new(strings(proxies)),
        QuestionSequence::new(strings(&["p1", "p2"])).unwrap(),
        Box::new(HttpTransport::new(&config.endpoint_url, config.request_timeout)),
    )
}

async fn dispatch_n(
    endpoint: String,
    keys: &'static [&'static str],
    proxies: &'static [&'static str],
    timeout: Duration,
    n: usize,
) -> Vec<DispatchOutcome> {
    tokio::task::spawn_blocking(move || {
        let mut dispatcher = build(&endpoint, keys, proxies, timeout);
        (0..n).map(|_| dispatcher.dispatch()).collect()
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn success_sends_bearer_key_and_chat_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(header("authorization", "Bearer k1"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "messages": [{"role": "user", "content": "p1"}],
            "model": "test-model",
            "max_tokens": 32,
            "temperature": 0.7,
            "top_p": 0.9
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "pong"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = format!("{}{}", server.uri(), COMPLETIONS_PATH);
    let outcomes = dispatch_n(endpoint, &["k1"], &[], Duration::from_secs(5), 1).await;

    let outcome = &outcomes[0];
    assert!(outcome.success, "unexpected failure: {:?}", outcome.error);
    assert_eq!(outcome.status, Some(200));
    assert_eq!(outcome.reply.as_deref(), Some("pong"));
    assert_eq!(outcome.credential_index, 1);
    assert_eq!(outcome.proxy_index, None);
}

#[tokio::test]
async fn keys_rotate_between_requests() {
    let server = MockServer::start().await;
    for key in ["k1", "k2"] {
        Mock::given(method("POST"))
            .and(header("authorization", format!("Bearer {}", key).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .expect(2)
            .mount(&server)
            .await;
    }

    let endpoint = format!("{}{}", server.uri(), COMPLETIONS_PATH);
    let outcomes = dispatch_n(endpoint, &["k1", "k2"], &[], Duration::from_secs(5), 4).await;

    let keys: Vec<usize> = outcomes.iter().map(|o| o.credential_index).collect();
    let prompts: Vec<usize> = outcomes.iter().map(|o| o.prompt_index).collect();
    assert_eq!(keys, vec![1, 2, 1, 2]);
    assert_eq!(prompts, vec![1, 2, 1, 2]);
    assert!(outcomes.iter().all(|o| o.success && o.reply.is_none()));
}

#[tokio::test]
async fn server_error_is_a_failed_dispatch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = format!("{}{}", server.uri(), COMPLETIONS_PATH);
    let outcomes = dispatch_n(endpoint, &["k1"], &[], Duration::from_secs(5), 1).await;

    let outcome = &outcomes[0];
    assert!(!outcome.success);
    assert_eq!(outcome.status, Some(500));
    assert!(outcome.error.as_deref().unwrap_or_default().contains("boom"));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_failed_dispatch() {
    let outcomes = dispatch_n(
        format!("http://127.0.0.1:1{}", COMPLETIONS_PATH),
        &["k1"],
        &[],
        Duration::from_secs(5),
        2,
    )
    .await;

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| !o.success && o.status.is_none() && o.error.is_some()));
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let endpoint = format!("{}{}", server.uri(), COMPLETIONS_PATH);
    let outcomes = dispatch_n(endpoint, &["k1"], &[], Duration::from_millis(200), 1).await;

    let outcome = &outcomes[0];
    assert!(!outcome.success);
    assert_eq!(outcome.status, None);
    assert!(outcome.error.is_some());
}

#[tokio::test]
async fn requests_go_through_the_rotated_proxy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let endpoint = format!("{}{}", server.uri(), COMPLETIONS_PATH);
    let outcomes = dispatch_n(
        endpoint,
        &["k1"],
        &["http://127.0.0.1:1", "not a proxy url"],
        Duration::from_secs(5),
        3,
    )
    .await;

    let proxies: Vec<Option<usize>> = outcomes.iter().map(|o| o.proxy_index).collect();
    assert_eq!(proxies, vec![Some(1), Some(2), Some(1)]);
    assert!(outcomes.iter().all(|o| !o.success));
    assert!(outcomes[1]
        .error
        .as_deref()
        .unwrap_or_default()
        .starts_with("invalid proxy"));
}

#[test]
fn body_stalling_after_ok_headers_is_a_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = [0u8; 4096];
        let _ = stream.read(&mut request);
        let head = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n";
        stream.write_all(head.as_bytes()).unwrap();
        stream.write_all(b"{\"cho").unwrap();
        stream.flush().unwrap();
        thread::sleep(Duration::from_secs(3));
    });

    let endpoint = format!("http://{}{}", addr, COMPLETIONS_PATH);
    let mut dispatcher = build(&endpoint, &["k1"], &[], Duration::from_millis(500));
    let outcome = dispatcher.dispatch();
    drop(dispatcher);

    assert!(!outcome.success, "partial body counted as success");
    assert_eq!(outcome.status, None);
    let error = outcome.error.unwrap_or_default();
    assert!(error.starts_with("request timed out"), "got: {error}");

    server.join().unwrap();
}
