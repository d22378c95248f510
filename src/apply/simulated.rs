use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use super::ApplyOperation;
use crate::error::ApplyError;

/// Stand-in backend: answers after a random latency and fails at a fixed rate.
pub struct SimulatedApply {
    failure_rate: f64,
    min_delay: Duration,
    max_delay: Duration,
}

impl SimulatedApply {
    pub const DEFAULT_FAILURE_RATE: f64 = 0.1;

    pub fn new(failure_rate: f64) -> Self {
        Self {
            failure_rate: if failure_rate.is_nan() {
                0.0
            } else {
                failure_rate.clamp(0.0, 1.0)
            },
            min_delay: Duration::from_millis(200),
            max_delay: Duration::from_millis(700),
        }
    }

    pub fn with_latency(mut self, min_delay: Duration, max_delay: Duration) -> Self {
        self.min_delay = min_delay.min(max_delay);
        self.max_delay = max_delay.max(min_delay);
        self
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl Default for SimulatedApply {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FAILURE_RATE)
    }
}

#[async_trait]
impl ApplyOperation for SimulatedApply {
    async fn apply(&self, kind: &str, _payload: &serde_json::Value) -> Result<(), ApplyError> {
        // Thread-local rng is not Send; draw everything before awaiting.
        let (fails, delay) = {
            let mut rng = rand::rng();
            let fails = rng.random_bool(self.failure_rate);
            let delay_ms = rng.random_range(millis(self.min_delay)..=millis(self.max_delay));
            (fails, Duration::from_millis(delay_ms))
        };

        tokio::time::sleep(delay).await;

        if fails {
            tracing::debug!("Simulated backend rejected '{kind}' after {}ms", delay.as_millis());
            return Err(ApplyError::from("Network error"));
        }
        Ok(())
    }
}
