use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default bound on how long a consumer waits for its producer.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(5);

/// Configuration for assertion chains.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Maximum time a consumer step waits for a pending producer.
    pub max_wait: Duration,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}

impl ChainConfig {
    pub fn with_max_wait(max_wait: Duration) -> Self {
        Self { max_wait }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_wait_is_five_seconds() {
        assert_eq!(ChainConfig::default().max_wait, Duration::from_millis(5000));
    }
}
