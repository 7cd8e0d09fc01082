//! Transport configuration

use std::time::Duration;

/// Configuration for one [`CallTransport`](crate::CallTransport)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Upper bound on the wait for any acknowledged call
    pub call_timeout: Duration,
    /// Name used in log events
    pub label: String,
}

impl TransportConfig {
    pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(label: impl Into<String>) -> Self {
        Self {
            call_timeout: Self::DEFAULT_CALL_TIMEOUT,
            label: label.into(),
        }
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::new("bridge")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let config = TransportConfig::default();
        assert_eq!(config.call_timeout, Duration::from_secs(5));
        assert_eq!(config.label, "bridge");
    }

    #[test]
    fn test_builder() {
        let config = TransportConfig::new("native").with_call_timeout(Duration::from_millis(250));
        assert_eq!(config.call_timeout, Duration::from_millis(250));
        assert_eq!(config.label, "native");
    }
}
