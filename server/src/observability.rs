//! Tracing Initialisation
//!
//! Installs a `tracing_subscriber` registry with an `EnvFilter` and either
//! JSON or pretty output on stderr. `RUST_LOG` takes precedence over the
//! configured filter.

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::{Config, LogFormat};

/// Parse filter directives such as `sg_server=info,sqlx=warn`.
pub fn build_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).with_context(|| format!("Invalid log filter '{directives}'"))
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn init(config: &Config) -> Result<()> {
    let directives = std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_filter.clone());
    let filter = build_filter(&directives)?;

    let output = match config.log_format {
        LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(output)
        .with(filter)
        .try_init()
        .context("Failed to install tracing subscriber")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_directives() {
        assert!(build_filter("sg_server=info").is_ok());
        assert!(build_filter("sg_server=debug,sqlx=warn").is_ok());
        assert!(build_filter("warn").is_ok());
    }

    #[test]
    fn test_build_filter_rejects_bad_level() {
        let err = build_filter("sg_server=loud").unwrap_err();
        assert!(err.to_string().contains("sg_server=loud"));
    }
}
