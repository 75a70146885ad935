use std::fs;
use std::path::Path;

use tracing::{error, info, warn};

use crate::config::{DispatchConfig, InputPaths};
use crate::dispatcher::Dispatcher;
use crate::error::{LoadError, StartupError};
use crate::llm::HttpTransport;
use crate::pools::{CredentialRotator, ProxyRotator, QuestionSequence};

/// Non-blank lines of a UTF-8 file, trimmed, in file order.
pub fn load_lines(path: &Path) -> Result<Vec<String>, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut lines = Vec::new();
    for line in raw.lines() {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }
    Ok(lines)
}

pub fn load_credentials(path: &Path) -> Result<Vec<String>, StartupError> {
    let keys = load_lines(path).map_err(|err| {
        error!(path = %path.display(), "failed to load api keys: {}", err);
        StartupError::CredentialsUnavailable(err)
    })?;
    if keys.is_empty() {
        error!(path = %path.display(), "api key file is empty");
        return Err(StartupError::NoCredentials);
    }
    Ok(keys)
}

/// Never fails: a missing or empty proxy file means direct connections.
pub fn load_proxies(path: &Path) -> Vec<String> {
    match load_lines(path) {
        Ok(proxies) => {
            if proxies.is_empty() {
                warn!(path = %path.display(), "proxy list is empty, connecting directly");
            }
            proxies
        }
        Err(err) => {
            error!(path = %path.display(), "failed to load proxies: {}", err);
            Vec::new()
        }
    }
}

pub fn load_prompts(path: &Path) -> Result<Vec<String>, StartupError> {
    let prompts = load_lines(path).map_err(|err| {
        error!(path = %path.display(), "failed to read questions: {}", err);
        StartupError::PromptsUnavailable(err)
    })?;
    if prompts.is_empty() {
        error!(path = %path.display(), "no questions in file");
        return Err(StartupError::NoPrompts);
    }
    Ok(prompts)
}

/// Loads keys, then proxies, then prompts, and wires them to an HTTP transport.
pub fn build_dispatcher(config: DispatchConfig, paths: &InputPaths) -> Result<Dispatcher, StartupError> {
    let config = config.normalized();
    let credentials = CredentialRotator::new(load_credentials(&paths.credentials)?)?;
    let proxies = ProxyRotator::new(load_proxies(&paths.proxies));
    let prompts = QuestionSequence::new(load_prompts(&paths.prompts)?)?;

    info!(
        credentials = credentials.len(),
        proxies = proxies.len(),
        prompts = prompts.len(),
        endpoint = %config.endpoint_url,
        model = %config.model,
        delay_secs = config.delay.as_secs_f64(),
        "inputs loaded"
    );

    let transport = HttpTransport::new(&config.endpoint_url, config.request_timeout);
    Ok(Dispatcher::new(
        config,
        credentials,
        proxies,
        prompts,
        Box::new(transport),
    ))
}
