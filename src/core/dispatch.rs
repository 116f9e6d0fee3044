use crate::domain::model::{Assignment, DeliveryEntry, DeliveryReport, DeliveryStatus, Pairing};
use crate::domain::ports::Notifier;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra tries after the first failed send.
    pub retry_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_attempts: 2,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// Sends one message per giver and records what happened to each.
/// Delivery problems end up in the report, never as an error.
pub struct Dispatcher<N: Notifier> {
    notifier: N,
    retry: RetryPolicy,
}

impl<N: Notifier> Dispatcher<N> {
    pub fn new(notifier: N) -> Self {
        Self::with_retry(notifier, RetryPolicy::default())
    }

    pub fn with_retry(notifier: N, retry: RetryPolicy) -> Self {
        Self { notifier, retry }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub async fn dispatch(&self, assignment: &Assignment) -> DeliveryReport {
        let mut entries = Vec::with_capacity(assignment.len());

        for pairing in assignment {
            let status = match self.notifier.address(&pairing.giver) {
                Some(address) => self.deliver(address, pairing).await,
                None => {
                    let reason = self.notifier.missing_address_reason();
                    tracing::warn!("✗ Skipping {} - {}", pairing.giver.name, reason);
                    DeliveryStatus::Skipped {
                        reason: reason.to_string(),
                    }
                }
            };

            entries.push(DeliveryEntry {
                giver: pairing.giver.name.clone(),
                receiver: pairing.receiver.name.clone(),
                status,
            });
        }

        DeliveryReport { entries }
    }

    async fn deliver(&self, address: &str, pairing: &Pairing) -> DeliveryStatus {
        let channel = self.notifier.channel();
        let total_attempts = self.retry.retry_attempts.saturating_add(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.notifier.notify(address, pairing).await {
                Ok(()) => {
                    tracing::info!("✓ Sent {} to {}", channel, pairing.giver.name);
                    return DeliveryStatus::Sent;
                }
                Err(e) if attempt < total_attempts => {
                    tracing::warn!(
                        attempt,
                        "Sending {} to {} failed, retrying: {}",
                        channel,
                        pairing.giver.name,
                        e
                    );
                    tokio::time::sleep(self.retry.retry_delay).await;
                }
                Err(e) => {
                    tracing::error!(
                        "✗ Failed to send {} to {}: {}",
                        channel,
                        pairing.giver.name,
                        e
                    );
                    return DeliveryStatus::Failed {
                        reason: e.to_string(),
                    };
                }
            }
        }
    }
}
