use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rune-ctl")]
#[command(version, about = "Generate enclave container bundle configurations", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Default spec in the current directory
    rune-ctl spec

    # Rootless spec for an existing bundle
    rune-ctl spec --rootless --bundle /containers/enclave

    # Different enclave runtime
    rune-ctl spec --enclave-runtime-path /opt/occlum/liberpal-occlum.so --enclave-runtime-args occlum_instance

    # Host facts relevant to spec generation
    rune-ctl check
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new specification file
    Spec(SpecArgs),

    /// Print host facts used when generating specs
    Check,
}

#[derive(Args, Debug, Clone)]
pub struct SpecArgs {
    /// Bundle directory to write config.json into
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub bundle: PathBuf,

    /// Generate a configuration for a rootless container
    #[arg(long)]
    pub rootless: bool,

    /// Replace an existing config.json
    #[arg(short, long)]
    pub force: bool,

    /// Enclave type annotation
    #[arg(long, value_name = "TYPE")]
    pub enclave_type: Option<String>,

    /// Path of the enclave runtime PAL library
    #[arg(long, value_name = "PATH")]
    pub enclave_runtime_path: Option<String>,

    /// Arguments passed to the enclave runtime
    #[arg(long, value_name = "ARGS")]
    pub enclave_runtime_args: Option<String>,
}
