//! Courier Scanner - Main entry point
//!
//! Scans a directory tree and publishes one durable record per file to
//! RabbitMQ, saving a local JSON backup copy of every record.

use anyhow::Result;
use clap::Parser;
use courier_scanner::backup::BackupWriter;
use courier_scanner::broker::{self, Publisher};
use courier_scanner::scan::{ExtFilter, Scanner};
use courier_scanner::shutdown::install_signal_handler;
use courier_scanner::{utils, Config};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Root directory to scan
    path: PathBuf,

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

    /// Queue to publish to (overrides config)
    #[arg(long)]
    queue: Option<String>,

    /// Show a progress spinner
    #[arg(long)]
    progress: bool,

    /// Comma-separated extensions to include, e.g. .txt,.csv
    #[arg(long)]
    ext: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration, then apply CLI overrides
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

    // Initialize logging
    utils::logger::init(&config.log, args.log_level.as_deref())?;

    tracing::info!(
        "Starting courier-scan v{} (root: {})",
        env!("CARGO_PKG_VERSION"),
        args.path.display()
    );

    let cancel = CancellationToken::new();
    install_signal_handler(cancel.clone());

    // Connect first: if the broker is unreachable the run aborts before any
    // filesystem work, so no backups are written for a run that cannot publish.
    let connection = broker::connect(&config.broker, &config.retry, &cancel).await?;

    let backup = BackupWriter::new(&config.scan.backup_dir)?;
    let filter = args
        .ext
        .as_deref()
        .map(ExtFilter::parse)
        .unwrap_or_else(ExtFilter::any);

    let scanner = Scanner::new(
        backup,
        filter,
        config.scan.follow_links,
        args.progress,
        cancel.clone(),
    );
    let mut publisher = Publisher::new(
        connection.channel().clone(),
        &config.broker,
        &config.retry,
        cancel.clone(),
    );

    let result = scanner.run(&args.path, &mut publisher).await;

    // The connection is closed on every exit path
    if let Err(e) = connection.close().await {
        tracing::warn!("Error closing broker connection: {}", e);
    }

    let report = result?;
    tracing::info!(
        "Done. Published {} of {} matched files to queue '{}' on {} ({} backup failures, {} publish failures){}",
        report.files_sent,
        report.files_matched,
        config.broker.queue,
        config.broker.endpoint(),
        report.backup_failures,
        report.publish_failures,
        if report.interrupted { " [interrupted]" } else { "" }
    );

    Ok(())
}
