mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{export, filter, predicate, sample};

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    simple_logger::init_with_level(match cli.verbose {
        0 => log::Level::Warn,
        1 => log::Level::Info,
        _ => log::Level::Debug,
    })?;

    match &cli.command {
        Commands::Filter(args) => filter::run(&cli, args),
        Commands::Sample(args) => sample::run(&cli, args),
        Commands::Export(args) => export::run(&cli, args),
        Commands::Predicate(args) => predicate::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
