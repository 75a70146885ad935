use chrono::{DateTime, Utc};

/// Record of a single dispatch; built and dropped within one iteration.
#[derive(Clone, Debug)]
pub struct DispatchOutcome {
    pub success: bool,
    pub prompt_index: usize,
    pub credential_index: usize,
    pub proxy_index: Option<usize>,
    pub status: Option<u16>,
    pub error: Option<String>,
    pub reply: Option<String>,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

/// Tally kept by the paced loop.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub iterations: u64,
    pub succeeded: u64,
    pub failed: u64,
}

impl LoopStats {
    pub fn record(&mut self, success: bool) {
        self.iterations += 1;
        if success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}
