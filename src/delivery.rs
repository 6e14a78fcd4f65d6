//! Delayed reply delivery with exponential backoff.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::platform::{ReplySender, ReplyTarget};

/// Timing for one reply. Attempt `n` (1-based) waits
/// `min(initial_delay * 2^(n-1), max_delay)` before sending.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryPolicy {
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: u64,
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_initial_delay_secs() -> u64 {
    15
}

fn default_max_delay_secs() -> u64 {
    120
}

fn default_max_attempts() -> u32 {
    5
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            initial_delay_secs: default_initial_delay_secs(),
            max_delay_secs: default_max_delay_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl DeliveryPolicy {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay_secs)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_secs(self.max_delay_secs.max(self.initial_delay_secs))
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let factor = 1u32 << exponent;
        self.initial_delay()
            .checked_mul(factor)
            .map_or(self.max_delay(), |d| d.min(self.max_delay()))
    }
}

/// Result of delivering one reply
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    Delivered {
        attempts: u32,
    },
    Failed {
        attempts: u32,
        last_error: String,
    },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

/// Sends replies after the deliberate delay, retrying failed sends.
#[derive(Debug, Clone, Default)]
pub struct DeliveryScheduler {
    policy: DeliveryPolicy,
}

impl DeliveryScheduler {
    pub fn new(policy: DeliveryPolicy) -> Self {
        Self { policy }
    }

    /// Wait, send, and retry until the send succeeds or the policy gives up.
    pub async fn deliver(
        &self,
        sender: &dyn ReplySender,
        target: &ReplyTarget,
        text: &str,
    ) -> DeliveryOutcome {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let delay = self.policy.delay_for(attempt);
            debug!(attempt, delay_secs = delay.as_secs(), chat = %target.chat_id, "Waiting before reply");
            tokio::time::sleep(delay).await;

            match sender.send(target, text).await {
                Ok(()) => {
                    debug!(attempt, chat = %target.chat_id, "Reply delivered");
                    return DeliveryOutcome::Delivered { attempts: attempt };
                }
                Err(e) => {
                    let capped = delay >= self.policy.max_delay();
                    if capped || attempt >= max_attempts {
                        error!(
                            attempt,
                            chat = %target.chat_id,
                            "Giving up on reply delivery: {:#}",
                            e
                        );
                        return DeliveryOutcome::Failed {
                            attempts: attempt,
                            last_error: format!("{:#}", e),
                        };
                    }
                    warn!(
                        attempt,
                        next_delay_secs = self.policy.delay_for(attempt + 1).as_secs(),
                        "Reply delivery failed, retrying: {:#}",
                        e
                    );
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Fails the first `failures` sends and records when each send happened.
    struct FlakySender {
        failures: usize,
        started: Instant,
        sends: Mutex<Vec<Duration>>,
    }

    impl FlakySender {
        fn new(failures: usize) -> Self {
            Self {
                failures,
                started: Instant::now(),
                sends: Mutex::new(Vec::new()),
            }
        }

        /// Gap before each send, measured from the previous one.
        fn gaps(&self) -> Vec<Duration> {
            let sends = self.sends.lock().unwrap();
            let mut previous = Duration::ZERO;
            sends
                .iter()
                .map(|at| {
                    let gap = *at - previous;
                    previous = *at;
                    gap
                })
                .collect()
        }
    }

    #[async_trait]
    impl ReplySender for FlakySender {
        async fn send(&self, _target: &ReplyTarget, _text: &str) -> Result<()> {
            let mut sends = self.sends.lock().unwrap();
            sends.push(self.started.elapsed());
            if sends.len() <= self.failures {
                bail!("connection reset");
            }
            Ok(())
        }
    }

    fn target() -> ReplyTarget {
        ReplyTarget {
            chat_id: "1".to_string(),
            reply_to: None,
        }
    }

    #[test]
    fn test_delay_schedule_doubles_up_to_cap() {
        let policy = DeliveryPolicy::default();
        let secs: Vec<u64> = (1..=6).map(|n| policy.delay_for(n).as_secs()).collect();
        assert_eq!(secs, vec![15, 30, 60, 120, 120, 120]);
        assert_eq!(policy.delay_for(u32::MAX), policy.max_delay());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_send_waits_initial_delay() {
        let sender = FlakySender::new(0);
        let outcome = DeliveryScheduler::default()
            .deliver(&sender, &target(), "halo")
            .await;
        assert_eq!(outcome, DeliveryOutcome::Delivered { attempts: 1 });
        let secs: Vec<u64> = sender.gaps().iter().map(Duration::as_secs).collect();
        assert_eq!(secs, vec![15]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_failure_waits_longer() {
        let sender = FlakySender::new(1);
        let outcome = DeliveryScheduler::default()
            .deliver(&sender, &target(), "halo")
            .await;
        assert_eq!(outcome, DeliveryOutcome::Delivered { attempts: 2 });
        let gaps = sender.gaps();
        assert_eq!(gaps.len(), 2);
        assert!(gaps[1] > gaps[0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_once_delay_reaches_cap() {
        let sender = FlakySender::new(usize::MAX);
        let scheduler = DeliveryScheduler::new(DeliveryPolicy {
            initial_delay_secs: 15,
            max_delay_secs: 60,
            max_attempts: 10,
        });
        let outcome = scheduler.deliver(&sender, &target(), "halo").await;

        match outcome {
            DeliveryOutcome::Failed { attempts, last_error } => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("connection reset"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        let secs: Vec<u64> = sender.gaps().iter().map(Duration::as_secs).collect();
        assert_eq!(secs, vec![15, 30, 60]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let sender = FlakySender::new(usize::MAX);
        let scheduler = DeliveryScheduler::new(DeliveryPolicy {
            initial_delay_secs: 1,
            max_delay_secs: 600,
            max_attempts: 2,
        });
        let outcome = scheduler.deliver(&sender, &target(), "halo").await;
        assert!(!outcome.is_delivered());
        assert_eq!(sender.gaps().len(), 2);
    }
}
