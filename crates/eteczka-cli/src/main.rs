mod batch;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use eteczka::{init_logging, load_config, Config, EmployeeDirectory};

#[derive(Parser)]
#[command(name = "eteczka")]
#[command(about = "Upload scanned documents into an employee's personnel file")]
#[command(version)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Config file (JSON or YAML). Built-in defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List employees matching a search term
    Employees {
        /// Matched against name, position and department
        term: Option<String>,
    },

    /// Run a batch file through the whole upload workflow
    Run {
        /// JSON batch file
        batch: PathBuf,

        /// Give all attestations and commit. Without it the run stops at
        /// the preview and prints the summary.
        #[arg(long)]
        confirm: bool,
    },

    /// Validate the config and print the effective settings
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Config::default(),
    };
    init_logging(&config.logging, cli.verbose)?;
    info!("Starting eteczka v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Employees { term } => {
            let directory = load_directory(&config)?;
            for employee in directory.search(term.as_deref().unwrap_or_default()) {
                println!(
                    "{}\t{}\t{}\t{}",
                    employee.id, employee.name, employee.position, employee.department
                );
            }
            Ok(())
        }
        Command::Run { batch, confirm } => {
            let directory = load_directory(&config)?;
            let report = batch::run(&config, directory, &batch, confirm).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Command::CheckConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn load_directory(config: &Config) -> Result<EmployeeDirectory> {
    match &config.directory.employees_file {
        Some(path) => EmployeeDirectory::load(path)
            .with_context(|| format!("Failed to load employee directory: {}", path)),
        None => Ok(EmployeeDirectory::default()),
    }
}
