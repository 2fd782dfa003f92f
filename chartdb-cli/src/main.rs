//! ChartDB CLI - command-line client for the chart database service.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::charts;
use error::CliError;

#[derive(Debug, Parser)]
#[command(
    name = "chartdb",
    version,
    about = "Publish, browse, and curate charts in the chart database cloud service"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List chart headers (cache-first)
    List(charts::ListArgs),
    /// Show one chart in full
    Show(charts::ShowArgs),
    /// Publish a new chart
    Publish(charts::PublishArgs),
    /// Update an existing chart
    Update(charts::UpdateArgs),
    /// Delete a chart (tombstone)
    Delete(charts::DeleteArgs),
    /// Toggle the curated flag of a chart
    Curate(charts::CurateArgs),
    /// Show the effective configuration
    Config,
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::List(args) => charts::list(args),
        Command::Show(args) => charts::show(args),
        Command::Publish(args) => charts::publish(args),
        Command::Update(args) => charts::update(args),
        Command::Delete(args) => charts::delete(args),
        Command::Curate(args) => charts::curate(args),
        Command::Config => charts::show_config(),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_with_refresh() {
        let cli = Cli::try_parse_from(["chartdb", "list", "--refresh", "--json"]).unwrap();
        match cli.command {
            Command::List(args) => {
                assert!(args.refresh);
                assert!(args.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_curate_off() {
        let cli = Cli::try_parse_from(["chartdb", "curate", "12", "--off"]).unwrap();
        match cli.command {
            Command::Curate(args) => {
                assert_eq!(args.id, 12);
                assert!(args.off);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
