//! rune-ctl - generate OCI bundle configurations for enclave containers

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use commands::{check_requirements, generate_spec};
use console::style;

fn main() {
    let cli = Cli::parse();

    logging::init_logger(cli.verbose);

    match cli.command {
        Commands::Spec(args) => match generate_spec(&args) {
            Ok(path) => println!("{} {}", style("created").green().bold(), path.display()),
            Err(e) => {
                eprintln!("{} {}", style("error:").red().bold(), e);
                std::process::exit(1);
            }
        },
        Commands::Check => check_requirements(),
    }
}
