use attrcastapp::config::OutputFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "attrcast", bin_name = "attrcast", version)]
#[command(about = "Check JSON inputs against declarative attribute filters", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Config file to load instead of ./attrcast.toml
    #[arg(long, global = true, value_name = "PATH", help_heading = "Options")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate an input document against a schema
    Check {
        /// Schema file (JSON: `types` and `attributes`)
        schema: PathBuf,

        /// Input document (a JSON object of attribute values)
        input: PathBuf,

        /// Stop at the first failing attribute
        #[arg(long)]
        fail_fast: bool,

        /// Report format
        #[arg(long, value_enum)]
        output: Option<OutputArg>,
    },

    /// List the registered filter kinds
    Kinds,

    /// Show the effective configuration
    Config {
        /// Print a commented sample attrcast.toml instead
        #[arg(long)]
        template: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    Text,
    Json,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Text => OutputFormat::Text,
            OutputArg::Json => OutputFormat::Json,
        }
    }
}
