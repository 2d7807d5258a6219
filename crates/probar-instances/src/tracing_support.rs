//! Tracing subscriber setup.
//!
//! The library only emits `tracing` events (accessor installs, cache hits,
//! rebuilds, readiness waits). Test binaries that want to see them install a
//! subscriber once with [`init_tracing`].

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "PROBAR_LOG";

/// Output format of the subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TracingFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Install a global fmt subscriber.
///
/// `default_filter` applies unless `PROBAR_LOG` is set. Returns `false` if a
/// subscriber was already installed.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_tracing(default_filter: &str, format: TracingFormat) -> bool {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer();
    match format {
        TracingFormat::Pretty => builder.try_init().is_ok(),
        TracingFormat::Json => builder.json().try_init().is_ok(),
    }
}
