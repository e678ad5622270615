/// Console logging setup.
///
/// Log lines go through `tracing`; this installs the fmt subscriber once at
/// startup. `RUST_LOG` takes precedence over the default level, e.g.
/// `RUST_LOG=surge_notifier=debug` to see per-station tier decisions.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `verbose` lowers the default level to
/// `debug`. Safe to call more than once; later calls are ignored.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
