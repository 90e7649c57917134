//! Optional `tracing` subscriber setup for binaries and tests embedding the
//! crate. The library itself only emits events; it never installs a
//! subscriber on its own.

use tracing_subscriber::EnvFilter;

/// Install a formatted subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence; otherwise `default_directive` (for example
/// `"filekeep=debug"`) selects what is shown. Returns `false` if a global
/// subscriber was already installed, which makes repeated calls harmless.
pub fn init_logging(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok()
}
