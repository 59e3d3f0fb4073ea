//! Courier Replay - Offline backup reader
//!
//! Prints every locally backed-up record without touching the broker.

use anyhow::Result;
use clap::Parser;
use courier_consumer::replay::load_backups;
use courier_scanner::config::LogConfig;
use courier_scanner::utils;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backup directory to replay
    #[arg(default_value = "backup_json")]
    backup_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    utils::logger::init(&LogConfig::default(), Some(&args.log_level))?;

    if !args.backup_dir.exists() {
        println!("No backup found!");
        return Ok(());
    }

    let entries = load_backups(&args.backup_dir)?;
    for entry in &entries {
        println!("Offline message: {}", entry.record);
    }
    tracing::info!(
        "Replayed {} records from {}",
        entries.len(),
        args.backup_dir.display()
    );

    Ok(())
}
