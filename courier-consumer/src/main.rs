//! Courier Consumer - Main entry point
//!
//! Passive consumer: prints every record delivered to the queue and
//! acknowledges it. Limits itself to one unacknowledged message at a time
//! so the broker never floods a slow consumer.

use anyhow::Result;
use clap::Parser;
use courier_consumer::consume::decode_payload;
use courier_scanner::broker;
use courier_scanner::shutdown::install_signal_handler;
use courier_scanner::{utils, Config};
use futures_util::StreamExt;
use lapin::options::{BasicAckOptions, BasicConsumeOptions, BasicQosOptions};
use lapin::types::FieldTable;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// RabbitMQ host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// AMQP port (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Broker username (overrides config)
    #[arg(long)]
    user: Option<String>,

    /// Broker password (overrides config)
    #[arg(long)]
    password: Option<String>,

    /// Queue to consume from (overrides config)
    #[arg(long)]
    queue: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = if let Some(config_path) = &args.config {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };
    if let Some(host) = args.host {
        config.broker.host = host;
    }
    if let Some(port) = args.port {
        config.broker.port = port;
    }
    if let Some(user) = args.user {
        config.broker.user = user;
    }
    if let Some(password) = args.password {
        config.broker.password = password;
    }
    if let Some(queue) = args.queue {
        config.broker.queue = queue;
    }

    config.validate()?;

    utils::logger::init(&config.log, args.log_level.as_deref())?;

    let cancel = CancellationToken::new();
    install_signal_handler(cancel.clone());

    let connection = broker::connect(&config.broker, &config.retry, &cancel).await?;

    // One unacknowledged message at a time
    connection
        .channel()
        .basic_qos(1, BasicQosOptions::default())
        .await?;

    let mut consumer = connection
        .channel()
        .basic_consume(
            &config.broker.queue,
            "courier-consume",
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await?;

    tracing::info!(
        "Listening to queue '{}' on {}. Press Ctrl+C to exit.",
        config.broker.queue,
        config.broker.endpoint()
    );

    loop {
        tokio::select! {
            delivery = consumer.next() => {
                let Some(delivery) = delivery else {
                    tracing::info!("Consumer stream closed by broker");
                    break;
                };
                let delivery = match delivery {
                    Ok(delivery) => delivery,
                    Err(e) => {
                        tracing::error!("Consumer stream error: {}", e);
                        break;
                    }
                };

                if let Some(record) = decode_payload(&delivery.data) {
                    println!("Received: {}", record);
                }

                // Acknowledge regardless of decode outcome; malformed
                // bodies are dropped, not redelivered
                if let Err(e) = delivery.ack(BasicAckOptions::default()).await {
                    tracing::error!("Failed to acknowledge delivery: {}", e);
                    break;
                }
            }
            _ = cancel.cancelled() => {
                tracing::info!("Exiting...");
                break;
            }
        }
    }

    if let Err(e) = connection.close().await {
        tracing::warn!("Error closing broker connection: {}", e);
    }

    Ok(())
}
