use super::init_tracing;
use super::print::{render_config, render_errors, render_kinds, render_values};
use super::setup::{Cli, Commands, OutputArg};
use anyhow::{bail, Context, Result};
use attrcastapp::config::{AttrcastConfig, CONFIG_FILE_NAME};
use attrcastapp::registry::registered_kinds;
use attrcastapp::schema::{load_inputs, SchemaFile};
use attrcastapp::types::global_types;
use clap::Parser;
use std::path::{Path, PathBuf};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            schema,
            input,
            fail_fast,
            output,
        } => handle_check(&schema, &input, apply_flags(config, fail_fast, output)),
        Commands::Kinds => {
            print!("{}", render_kinds(&registered_kinds()));
            Ok(())
        }
        Commands::Config { template } => {
            if template {
                print!("{}", AttrcastConfig::template());
            } else {
                print!("{}", render_config(&config));
            }
            Ok(())
        }
    }
}

/// An explicit `--config` must exist; the default `attrcast.toml` is optional.
fn load_config(path: Option<&Path>) -> Result<AttrcastConfig> {
    let path = match path {
        Some(p) if !p.exists() => bail!("config file not found: {}", p.display()),
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(CONFIG_FILE_NAME),
    };
    AttrcastConfig::load(&path).with_context(|| format!("loading {}", path.display()))
}

/// Command-line flags override file and environment settings.
fn apply_flags(mut config: AttrcastConfig, fail_fast: bool, output: Option<OutputArg>) -> AttrcastConfig {
    if fail_fast {
        config.fail_fast = true;
    }
    if let Some(output) = output {
        config.output = output.into();
    }
    config
}

fn handle_check(schema_path: &Path, input_path: &Path, config: AttrcastConfig) -> Result<()> {
    let file = SchemaFile::load(schema_path)
        .with_context(|| format!("reading schema {}", schema_path.display()))?;
    file.define_types(&global_types());
    let schema = file.into_schema(config.fail_fast)?;
    tracing::debug!(
        schema = %schema_path.display(),
        attributes = schema.attributes().count(),
        "schema loaded"
    );

    let inputs = load_inputs(input_path)
        .with_context(|| format!("reading input {}", input_path.display()))?;

    match schema.validate(&inputs) {
        Ok(values) => {
            print!("{}", render_values(&values, config.output)?);
            Ok(())
        }
        Err(errors) => {
            print!("{}", render_errors(&errors, config.output)?);
            bail!("{} attribute(s) failed validation", errors.len())
        }
    }
}
