//! Logging and tracing bootstrap for STACKS.

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

use stacks_kernel::settings::{LogFormat, TelemetrySettings};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured default filter. Call once at startup;
/// a second call fails because the global subscriber is already set.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .map_err(|e| anyhow!("invalid tracing filter '{}': {e}", settings.filter))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match settings.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))?;

    tracing::debug!(format = ?settings.log_format, "telemetry initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_filter_directive_is_rejected() {
        // Only meaningful when RUST_LOG is unset; guard for CI environments.
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }

        let settings = TelemetrySettings {
            filter: "not==valid".to_string(),
            log_format: LogFormat::Pretty,
        };
        assert!(init(&settings).is_err());
    }
}
