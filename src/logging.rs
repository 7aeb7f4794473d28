use std::env;

use tracing_subscriber::EnvFilter;

/// Install the stderr tracing subscriber for the binaries.
///
/// `RUST_LOG` wins when set; otherwise the crate logs at `info`, or `debug`
/// with `verbose`, and dependencies stay at `warn`.
pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = env::var("RUST_LOG").map_or_else(
        |_| {
            EnvFilter::new("warn").add_directive(
                format!("insulin_wave={}", level)
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::INFO.into()),
            )
        },
        |directive| EnvFilter::new(&directive),
    );

    // A second call keeps the subscriber that is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
