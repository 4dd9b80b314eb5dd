use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Logical time in milliseconds since the owning scheduler started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Tick {
    pub ms: u64,
}

impl Tick {
    pub fn from_duration(elapsed: Duration) -> Self {
        Tick {
            ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn after(&self, delay: Duration) -> Self {
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        Tick {
            ms: self.ms.saturating_add(delay_ms),
        }
    }

    pub fn since(&self, earlier: Tick) -> Duration {
        Duration::from_millis(self.ms.saturating_sub(earlier.ms))
    }
}
