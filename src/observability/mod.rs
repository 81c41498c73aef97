//! Logging setup for the a11ymap binary.
//!
//! Library code only emits `tracing` events and spans; the binary installs a
//! `tracing-subscriber` formatter writing to stderr so report output on
//! stdout stays clean.
//!
//! `RUST_LOG` takes precedence. Otherwise the `-v` count picks the level:
//! none => `warn`, `-v` => `debug`, `-vv` or more => `trace`.

use tracing_subscriber::EnvFilter;

/// Default filter directive for a verbosity count.
pub fn verbosity_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Calling it twice is harmless; the second
/// call is ignored.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
