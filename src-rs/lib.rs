pub mod config;
pub mod dispatcher;
pub mod error;
pub mod helpers;
pub mod paced_loop;
pub mod pools;
pub mod result;

#[path = "llm/lib.rs"]
pub mod llm;

pub use config::{DispatchConfig, InputPaths};
pub use dispatcher::Dispatcher;
pub use error::{LoadError, StartupError};
pub use paced_loop::{PacedLoop, Pause, ThreadSleep};
pub use pools::{Credential, CredentialRotator, Prompt, ProxyEndpoint, ProxyRoute, ProxyRotator, QuestionSequence};
pub use result::{DispatchOutcome, LoopStats};
