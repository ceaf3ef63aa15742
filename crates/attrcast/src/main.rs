//! # Attrcast CLI
//!
//! `attrcast` checks JSON documents against declared attribute filters. The
//! binary is intentionally thin: everything lives in `src/cli/`, and this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/attrcastapp/`: the library (filters, registry, types, schemas)
//! - `crates/attrcast/`: this CLI, one client of the library
//!
//! ## Commands
//!
//! - `attrcast check <schema.json> <input.json>`: validate an input document.
//!   Prints the typed values and exits 0, or prints one line per failing
//!   attribute and exits 1.
//! - `attrcast kinds`: list the registered filter kinds.
//! - `attrcast config`: show the effective configuration
//!   (`--template` prints a commented sample `attrcast.toml`).
//!
//! ## Logging
//!
//! Diagnostics go to stderr through `tracing`. `RUST_LOG` selects the
//! level (default `warn`); `--verbose` raises it to `debug`.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
