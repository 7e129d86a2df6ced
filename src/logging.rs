//! Log output for applications using the datastore.

use tracing_subscriber::FmtSubscriber;

use crate::cmdline::LogLevel;
use crate::{Error, Result};

/// Installs a global fmt subscriber writing to stderr at `level`.
///
/// Fails if a global subscriber is already installed.
pub fn init(level: LogLevel) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level.as_tracing_level())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(|e| Error::Logging(e.to_string()))
}
