//! Logging setup.

use crate::error::{Error, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global stderr subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).map_err(|e| Error::Config(e.to_string()))?;

    tracing::info!("visor v{} started", env!("CARGO_PKG_VERSION"));
    Ok(())
}
