//! Application Configuration

use std::time::Duration;

/// Todo application configuration
#[derive(Debug, Clone)]
pub struct TodoConfig {
    /// Deadline for each storage call
    pub request_timeout: Duration,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
        }
    }
}
