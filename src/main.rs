use std::process::ExitCode;

use clap::{Parser, Subcommand};
use scloom::command;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a per-sample MatrixMarket UMI matrix into a loom file
    Convert(command::ConvertCMD),
    /// Derive an intron count matrix from matched exon and gene loom files
    Intron(command::IntronCMD),
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert(mut cmd) => cmd.try_execute(),
        Commands::Intron(mut cmd) => cmd.try_execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    return ExitCode::SUCCESS;
}
