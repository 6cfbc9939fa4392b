//! Tracing setup shared by the binaries.

use tracing_subscriber::EnvFilter;

/// Install a stderr `tracing` subscriber.
///
/// `RUST_LOG` wins when set. Otherwise only warnings are shown, or debug
/// output for this workspace's crates when `verbose` is true. Calling this
/// more than once is harmless.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,image_caption=debug,desktop_app=debug"
    } else {
        "warn"
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
