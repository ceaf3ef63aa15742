//! # CLI Layer
//!
//! The only place that knows about argument parsing, terminal output and
//! exit codes. Everything it does goes through `attrcastapp`.
//!
//! ## Structure
//!
//! - `setup`: argument parsing via clap
//! - `commands`: `run()` and the per-command handlers
//! - `print`: text and JSON report formatting

mod commands;
mod print;
pub mod setup;

pub use commands::run;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(env_filter)
        .init();
}
