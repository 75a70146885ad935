use std::io;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Conditions that stop the process before the dispatch loop starts.
#[derive(thiserror::Error, Debug)]
pub enum StartupError {
    #[error("credential list unavailable")]
    CredentialsUnavailable(#[source] LoadError),

    #[error("no credentials loaded")]
    NoCredentials,

    #[error("prompt list unavailable")]
    PromptsUnavailable(#[source] LoadError),

    #[error("no prompts loaded")]
    NoPrompts,
}

impl StartupError {
    /// Credential problems exit non-zero; a missing prompt list only aborts startup.
    pub fn exit_code(&self) -> u8 {
        match self {
            StartupError::CredentialsUnavailable(_) | StartupError::NoCredentials => 1,
            StartupError::PromptsUnavailable(_) | StartupError::NoPrompts => 0,
        }
    }
}
