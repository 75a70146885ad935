use std::time::Instant;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::config::DispatchConfig;
use crate::llm::{CompletionRequest, CompletionTransport, Message};
use crate::pools::{CredentialRotator, ProxyRotator, QuestionSequence};
use crate::result::DispatchOutcome;

/// Owns the three rotators and sends one request per call.
pub struct Dispatcher {
    pub config: DispatchConfig,
    credentials: CredentialRotator,
    proxies: ProxyRotator,
    prompts: QuestionSequence,
    transport: Box<dyn CompletionTransport>,
}

impl Dispatcher {
    pub fn new(
        config: DispatchConfig,
        credentials: CredentialRotator,
        proxies: ProxyRotator,
        prompts: QuestionSequence,
        transport: Box<dyn CompletionTransport>,
    ) -> Self {
        Self {
            config: config.normalized(),
            credentials,
            proxies,
            prompts,
            transport,
        }
    }

    pub fn dispatch_one(&mut self) -> bool {
        self.dispatch().success
    }

    /// One attempt, no retry. Transport failures end up in the outcome, never in a panic.
    pub fn dispatch(&mut self) -> DispatchOutcome {
        let credential = self.credentials.next();
        let route = self.proxies.next();
        let prompt = self.prompts.next();

        info!(prompt_index = prompt.index, prompt = %prompt.text, "question");
        info!(
            credential_index = credential.index,
            proxy = %route.label(),
            "using api key #{} | proxy #{}",
            credential.index,
            route.label()
        );

        let request = CompletionRequest {
            messages: vec![Message::user(&prompt.text)],
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
        };

        let started_at = Utc::now();
        let timer = Instant::now();
        let result = self.transport.send(&request, &credential.secret, &route);
        let elapsed_ms = u64::try_from(timer.elapsed().as_millis()).unwrap_or(u64::MAX);

        let mut outcome = DispatchOutcome {
            success: false,
            prompt_index: prompt.index,
            credential_index: credential.index,
            proxy_index: route.index(),
            status: None,
            error: None,
            reply: None,
            started_at,
            elapsed_ms,
        };

        match result {
            Ok(reply) => {
                info!(status = reply.status, elapsed_ms, "response received");
                if let Some(content) = &reply.content {
                    debug!(reply = %content, "reply");
                }
                outcome.success = true;
                outcome.status = Some(reply.status);
                outcome.reply = reply.content;
            }
            Err(err) => {
                error!(
                    code = err.code(),
                    credential_index = credential.index,
                    proxy = %route.label(),
                    elapsed_ms,
                    "request failed: {}",
                    err
                );
                outcome.status = err.status();
                outcome.error = Some(err.to_string());
            }
        }
        outcome
    }

    pub fn credential_count(&self) -> usize {
        self.credentials.len()
    }

    pub fn proxy_count(&self) -> usize {
        self.proxies.len()
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.len()
    }
}
