//! Publishing records to the durable queue with per-message retry.
//!
//! Each publish goes to the default exchange with the queue name as routing
//! key, flagged persistent so the broker writes it to stable storage. The
//! channel runs with publisher confirms, so a publish either comes back
//! acknowledged or the caller is told it failed; nothing is dropped silently.

use crate::config::{BrokerConfig, RetryConfig};
use crate::record::FileRecord;
use crate::retry::{exponential_backoff, retry_with_backoff, RetryError};
use crate::scan::RecordSink;
use crate::utils::errors::{Result, ScannerError};
use lapin::options::BasicPublishOptions;
use lapin::publisher_confirm::Confirmation;
use lapin::{BasicProperties, Channel};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// AMQP delivery mode 2: message persisted by the broker
const DELIVERY_MODE_PERSISTENT: u8 = 2;

/// Publishes records over one channel, retrying failed sends
pub struct Publisher {
    channel: Channel,
    queue: String,
    max_attempts: u32,
    cancel: CancellationToken,
}

impl Publisher {
    pub fn new(
        channel: Channel,
        broker: &BrokerConfig,
        retry: &RetryConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            channel,
            queue: broker.queue.clone(),
            max_attempts: retry.publish_attempts,
            cancel,
        }
    }

    /// Publish one record. Retries transport failures with `2^attempt`
    /// second backoff; after `max_attempts` failures returns
    /// `PublishFailed`, which callers treat as non-fatal.
    pub async fn publish(&self, record: &FileRecord) -> Result<()> {
        let payload = serde_json::to_vec(record)?;

        retry_with_backoff(
            |attempt| {
                let channel = self.channel.clone();
                let queue = self.queue.clone();
                let payload = payload.clone();
                async move {
                    debug!("Publishing to '{}' (attempt {})", queue, attempt);
                    let confirm = channel
                        .basic_publish(
                            "",
                            &queue,
                            BasicPublishOptions::default(),
                            &payload,
                            BasicProperties::default()
                                .with_delivery_mode(DELIVERY_MODE_PERSISTENT)
                                .with_content_type("application/json".into()),
                        )
                        .await?
                        .await?;

                    match confirm {
                        Confirmation::Nack(_) => Err(ScannerError::PublishNacked),
                        _ => Ok(()),
                    }
                }
            },
            self.max_attempts,
            exponential_backoff(2.0),
            &self.cancel,
        )
        .await
        .map_err(|e| match e {
            RetryError::Exhausted { attempts, .. } => ScannerError::PublishFailed { attempts },
            RetryError::Cancelled => ScannerError::Interrupted,
        })
    }
}

impl RecordSink for Publisher {
    async fn deliver(&mut self, record: &FileRecord) -> Result<()> {
        self.publish(record).await
    }
}
