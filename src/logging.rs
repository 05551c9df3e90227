//! Sets up the diagnostic sink that handlers log caught store failures to.

use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// The log filter is taken from the `RUST_LOG` environment variable, falling
/// back to the `info` level when it is not set.
///
/// # Errors
/// Returns an error if a global subscriber has already been installed.
pub fn initialize() -> Result<(), SetGlobalDefaultError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}
