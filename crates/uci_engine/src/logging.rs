//! Diagnostic logging to stderr. Stdout carries protocol and game output.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins when set; otherwise only
/// warnings are shown, or only errors when `mute` is on.
pub fn init(mute: bool) {
    let default = if mute { "error" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
