//! Structured logging setup.
//!
//! `RUST_LOG` takes precedence over the configured level. Output goes to
//! stderr so the demo's stdout stays readable.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::types::settings::LoggingSettings;

/// Builds the filter: `RUST_LOG` if set and valid, else `tabdeck=<level>`.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("tabdeck={}", level)))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber.
///
/// Returns false if a subscriber was already installed, which happens when
/// tests or an embedding application set one up first.
pub fn init_logging(settings: &LoggingSettings) -> bool {
    let installed = tracing_subscriber::registry()
        .with(build_filter(&settings.level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(level = %settings.level, "logging initialized");
    }
    installed
}
