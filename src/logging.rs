//! Tracing subscriber setup for binaries and tests that embed the library.
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;

/// Install a formatting subscriber. `RUST_LOG` takes precedence over
/// `filter`. Returns `false` when a global subscriber was already set.
pub fn init(filter: &str) -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .is_ok()
}

pub fn init_from_config(config: &LoggingConfig) -> bool {
    init(&config.filter)
}
