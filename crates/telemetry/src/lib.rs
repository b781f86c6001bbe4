//! Logging bootstrap.
//!
//! `RUST_LOG` takes precedence over the configured filter so operators can
//! raise verbosity without touching config files.

use anyhow::anyhow;
use shelf_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = filter_for(settings);
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match settings.log_format {
        LogFormat::Pretty => builder.with_target(true).try_init(),
        LogFormat::Json => builder
            .json()
            .with_current_span(true)
            .flatten_event(true)
            .try_init(),
    };

    result.map_err(|err| anyhow!(err))?;

    tracing::debug!(
        target: "shelf-telemetry",
        format = ?settings.log_format,
        "telemetry initialized"
    );
    Ok(())
}

fn filter_for(settings: &TelemetrySettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_filter_falls_back_to_info() {
        let settings = TelemetrySettings {
            filter: "shelf=notalevel[".to_string(),
            ..TelemetrySettings::default()
        };
        // Only meaningful when RUST_LOG is unset, which is the case under cargo test
        if std::env::var("RUST_LOG").is_err() {
            assert_eq!(filter_for(&settings).to_string(), "info");
        }
    }

    #[test]
    fn second_init_is_an_error() {
        let settings = TelemetrySettings::default();
        let _ = init(&settings);
        assert!(init(&settings).is_err());
    }
}
