use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use prompt_relay_rs::config::{DEFAULT_ENDPOINT_URL, DEFAULT_MODEL};
use prompt_relay_rs::helpers::build_dispatcher;
use prompt_relay_rs::{DispatchConfig, InputPaths, PacedLoop};

/// Sends each question in turn to a chat-completions endpoint, rotating api keys and proxies.
#[derive(Parser)]
#[command(name = "prompt-relay", version, about)]
struct Cli {
    /// File with one api key per line.
    #[arg(long, env = "PROMPT_RELAY_API_KEYS", default_value = "api_keys.txt")]
    api_keys: PathBuf,

    /// File with one proxy url per line; may be empty or missing.
    #[arg(long, env = "PROMPT_RELAY_PROXIES", default_value = "proxies.txt")]
    proxies: PathBuf,

    /// File with one question per line.
    #[arg(long, env = "PROMPT_RELAY_QUESTIONS", default_value = "questions.txt")]
    questions: PathBuf,

    #[arg(long, env = "PROMPT_RELAY_ENDPOINT", default_value = DEFAULT_ENDPOINT_URL)]
    endpoint: String,

    #[arg(long, env = "PROMPT_RELAY_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    #[arg(long, env = "PROMPT_RELAY_MAX_TOKENS", default_value_t = 2048)]
    max_tokens: u32,

    #[arg(long, env = "PROMPT_RELAY_TEMPERATURE", default_value_t = 0.7)]
    temperature: f64,

    #[arg(long, env = "PROMPT_RELAY_TOP_P", default_value_t = 0.9)]
    top_p: f64,

    /// Seconds to wait after each request.
    #[arg(long, env = "PROMPT_RELAY_DELAY_SECS", default_value_t = 15)]
    delay_secs: u64,

    /// Per-request timeout in seconds.
    #[arg(long, env = "PROMPT_RELAY_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Stop after this many requests instead of running until killed.
    #[arg(long)]
    iterations: Option<u64>,
}

impl Cli {
    fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            endpoint_url: self.endpoint.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            delay: Duration::from_secs(self.delay_secs),
            request_timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    fn input_paths(&self) -> InputPaths {
        InputPaths {
            credentials: self.api_keys.clone(),
            proxies: self.proxies.clone(),
            prompts: self.questions.clone(),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .ok();

    let cli = Cli::parse();

    let dispatcher = match build_dispatcher(cli.dispatch_config(), &cli.input_paths()) {
        Ok(dispatcher) => dispatcher,
        Err(err) => {
            match std::error::Error::source(&err) {
                Some(cause) => error!("startup aborted: {}: {}", err, cause),
                None => error!("startup aborted: {}", err),
            }
            return ExitCode::from(err.exit_code());
        }
    };

    let mut paced = PacedLoop::new(dispatcher);
    match cli.iterations {
        Some(n) => {
            let stats = paced.run_for(n);
            info!(
                iterations = stats.iterations,
                succeeded = stats.succeeded,
                failed = stats.failed,
                "finished"
            );
            ExitCode::SUCCESS
        }
        None => paced.run(),
    }
}
