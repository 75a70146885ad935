use std::fmt;

use crate::error::StartupError;
use crate::llm::CyclicRotator;

/// An API key together with its 1-based position in the key list.
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub index: usize,
    pub secret: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("index", &self.index)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyEndpoint {
    pub index: usize,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProxyRoute {
    Direct,
    Via(ProxyEndpoint),
}

impl ProxyRoute {
    pub fn index(&self) -> Option<usize> {
        match self {
            ProxyRoute::Direct => None,
            ProxyRoute::Via(endpoint) => Some(endpoint.index),
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            ProxyRoute::Direct => None,
            ProxyRoute::Via(endpoint) => Some(endpoint.url.as_str()),
        }
    }

    /// Log label: the proxy index, or `none` for a direct connection.
    pub fn label(&self) -> String {
        match self.index() {
            Some(idx) => idx.to_string(),
            None => "none".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub index: usize,
    pub text: String,
}

pub struct CredentialRotator {
    inner: CyclicRotator<String>,
}

impl CredentialRotator {
    pub fn new(secrets: Vec<String>) -> Result<Self, StartupError> {
        let inner = CyclicRotator::new(secrets).ok_or(StartupError::NoCredentials)?;
        Ok(Self { inner })
    }

    pub fn next(&mut self) -> Credential {
        let (index, secret) = self.inner.next();
        Credential {
            index,
            secret: secret.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Proxy pool that may be absent; an absent pool routes every request directly.
pub struct ProxyRotator {
    inner: Option<CyclicRotator<String>>,
}

impl ProxyRotator {
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            inner: CyclicRotator::new(urls),
        }
    }

    pub fn next(&mut self) -> ProxyRoute {
        match self.inner.as_mut() {
            Some(rotator) => {
                let (index, url) = rotator.next();
                ProxyRoute::Via(ProxyEndpoint {
                    index,
                    url: url.clone(),
                })
            }
            None => ProxyRoute::Direct,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.as_ref().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Prompts in file order, restarting from the first after the last.
pub struct QuestionSequence {
    inner: CyclicRotator<String>,
}

impl QuestionSequence {
    pub fn new(prompts: Vec<String>) -> Result<Self, StartupError> {
        let inner = CyclicRotator::new(prompts).ok_or(StartupError::NoPrompts)?;
        Ok(Self { inner })
    }

    pub fn next(&mut self) -> Prompt {
        let (index, text) = self.inner.next();
        Prompt {
            index,
            text: text.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
