//! Harness configuration

use serde::{Deserialize, Serialize};

/// Load test configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadTestConfig {
    /// Target base URL
    pub target_url: String,

    /// Concurrent virtual users; each controls the accounts its flow needs
    pub virtual_users: usize,

    /// Flows each virtual user runs, sequentially
    pub iterations: u32,

    /// Cap on flows in flight at once
    pub max_concurrency: usize,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Enable detailed logging
    pub verbose: bool,
}

impl Default for LoadTestConfig {
    fn default() -> Self {
        Self {
            target_url: "http://localhost:8080".to_string(),
            virtual_users: 10,
            iterations: 1,
            max_concurrency: 50,
            request_timeout_secs: 10,
            verbose: false,
        }
    }
}
