//! Log setup for the CLI.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "SALESDASH_LOG";

/// Install the stderr subscriber.
///
/// `SALESDASH_LOG` directives are applied on top of the base level, which
/// is WARN, or DEBUG with `verbose`. Calling this twice is harmless.
pub fn init(verbose: bool) {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let filter = EnvFilter::builder()
        .with_env_var(LOG_ENV)
        .with_default_directive(level.into())
        .from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}
