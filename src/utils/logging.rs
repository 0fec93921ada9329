use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr subscriber used by the binary.
///
/// `RUST_LOG` takes precedence; otherwise `-v` switches the crate to debug.
pub fn init_cli_logger(verbose: bool) {
    let fallback = if verbose {
        "nodebot_client=debug,warn"
    } else {
        "nodebot_client=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A second init (e.g. from tests) is not an error worth surfacing.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}
