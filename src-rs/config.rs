use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENDPOINT_URL: &str = "https://api.hyperbolic.xyz/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "meta-llama/Meta-Llama-3.1-8B-Instruct";

#[derive(Clone, Debug)]
pub struct DispatchConfig {
    pub endpoint_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub delay: Duration,
    pub request_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 2048,
            temperature: 0.7,
            top_p: 0.9,
            delay: Duration::from_secs(15),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl DispatchConfig {
    /// Fills fields that would make every request meaningless with their defaults.
    /// Temperature, top-p and delay are taken as given; zero is a valid choice for each.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        if self.endpoint_url.trim().is_empty() {
            self.endpoint_url = defaults.endpoint_url;
        }
        if self.model.trim().is_empty() {
            self.model = defaults.model;
        }
        if self.max_tokens == 0 {
            self.max_tokens = defaults.max_tokens;
        }
        if self.request_timeout.is_zero() {
            self.request_timeout = defaults.request_timeout;
        }
        self
    }
}

#[derive(Clone, Debug)]
pub struct InputPaths {
    pub credentials: PathBuf,
    pub proxies: PathBuf,
    pub prompts: PathBuf,
}

impl Default for InputPaths {
    fn default() -> Self {
        Self {
            credentials: PathBuf::from("api_keys.txt"),
            proxies: PathBuf::from("proxies.txt"),
            prompts: PathBuf::from("questions.txt"),
        }
    }
}
