//! Broker connection establishment with bounded exponential backoff.
//!
//! Connecting is the one fatal path in the pipeline: if the broker cannot be
//! reached within the configured attempts, the run aborts before any
//! filesystem work. Backoff waits are cancellable so Ctrl-C during an outage
//! does not hang.

use crate::config::{BrokerConfig, RetryConfig};
use crate::retry::{exponential_backoff, retry_with_backoff, RetryError};
use crate::utils::errors::{Result, ScannerError};
use lapin::options::{ConfirmSelectOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{Channel, Connection, ConnectionProperties};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// An established AMQP connection and its publish channel
pub struct BrokerConnection {
    connection: Connection,
    channel: Channel,
}

/// Connect to the broker, retrying with exponential backoff.
///
/// Waits `connect_backoff_secs^attempt` seconds between failures, attempt
/// count starting at 1. After `connect_attempts` consecutive failures
/// returns `ConnectionExhausted`; cancellation during a backoff wait
/// returns `Interrupted`. On success the returned channel has publisher
/// confirms enabled (every publish is either acknowledged or reported
/// failed) and the configured queue already declared durable, so callers
/// start from a channel bound to a queue that survives broker restarts.
pub async fn connect(
    broker: &BrokerConfig,
    retry: &RetryConfig,
    cancel: &CancellationToken,
) -> Result<BrokerConnection> {
    let uri = broker.amqp_uri();
    info!("Connecting to broker at {}", broker.endpoint());

    let connection = retry_with_backoff(
        |attempt| {
            let uri = uri.clone();
            async move {
                debug!("Connection attempt {}", attempt);
                Connection::connect(&uri, ConnectionProperties::default()).await
            }
        },
        retry.connect_attempts,
        exponential_backoff(retry.connect_backoff_secs),
        cancel,
    )
    .await
    .map_err(|e| match e {
        RetryError::Exhausted { attempts, source } => {
            error!(
                "Broker at {} unreachable after {} attempts: {}",
                broker.endpoint(),
                attempts,
                source
            );
            ScannerError::ConnectionExhausted { attempts }
        }
        RetryError::Cancelled => ScannerError::Interrupted,
    })?;

    let channel = connection.create_channel().await?;
    channel
        .confirm_select(ConfirmSelectOptions::default())
        .await?;

    // Durable: definition and contents survive a broker restart.
    // Idempotent on the broker side.
    channel
        .queue_declare(
            &broker.queue,
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await?;
    debug!("Declared durable queue '{}'", broker.queue);

    info!("Connected to broker at {}", broker.endpoint());
    Ok(BrokerConnection {
        connection,
        channel,
    })
}

impl BrokerConnection {
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Close the AMQP connection cleanly
    pub async fn close(self) -> Result<()> {
        self.connection.close(200, "shutting down").await?;
        Ok(())
    }
}
