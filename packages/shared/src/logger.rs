//! Logger setup shared by the Tamariba binaries.

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence. Without it, `default_level` applies to the
/// given binary and to the server library, everything else stays at `warn`.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let crate_name = bin_name.replace('-', "_");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,{crate_name}={default_level},tamariba_server={default_level},tower_http={default_level}"
        ))
    });

    // try_init so that tests calling this more than once do not panic
    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}
