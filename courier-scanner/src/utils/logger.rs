//! Tracing setup for the courier binaries.
//!
//! The effective level is resolved in order: `RUST_LOG` when set, then the
//! CLI `--log-level` override, then the `[log]` section of the config file.

use crate::config::LogConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &LogConfig, override_level: Option<&str>) -> anyhow::Result<()> {
    let level = override_level.unwrap_or(&config.level);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(LogConfig::default().level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_installs_exactly_once() {
        let config = LogConfig::default();
        assert!(init(&config, Some("debug")).is_ok());
        // A second install must be rejected, not silently swapped in
        assert!(init(&config, None).is_err());
    }
}
