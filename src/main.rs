use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxconv::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Do not read or write the persisted rate cache
    #[arg(long, global = true)]
    no_persist: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List known currency codes
    Currencies {
        /// Reference currency for the rate lookup
        #[arg(short, long)]
        base: Option<String>,
    },
    /// Convert an amount between two currencies
    Convert {
        amount: f64,
        from: String,
        to: String,
    },
    /// Manage and show configured currency pairs
    Pairs {
        #[command(subcommand)]
        command: Option<PairsCommands>,
    },
    /// Drop all cached exchange rates
    ClearCache,
}

#[derive(Subcommand)]
enum PairsCommands {
    /// Convert and display all configured pairs
    List,
    /// Add a pair, or update its amount
    Add {
        from: String,
        to: String,
        #[arg(short, long, default_value_t = 1.0)]
        amount: f64,
    },
    /// Remove a pair
    Remove { from: String, to: String },
}

impl From<PairsCommands> for fxconv::PairsCommand {
    fn from(cmd: PairsCommands) -> fxconv::PairsCommand {
        match cmd {
            PairsCommands::List => fxconv::PairsCommand::List,
            PairsCommands::Add { from, to, amount } => {
                fxconv::PairsCommand::Add { from, to, amount }
            }
            PairsCommands::Remove { from, to } => fxconv::PairsCommand::Remove { from, to },
        }
    }
}

impl From<Commands> for fxconv::AppCommand {
    fn from(cmd: Commands) -> fxconv::AppCommand {
        match cmd {
            Commands::Currencies { base } => fxconv::AppCommand::Currencies { base },
            Commands::Convert { amount, from, to } => {
                fxconv::AppCommand::Convert { amount, from, to }
            }
            Commands::Pairs { command } => fxconv::AppCommand::Pairs(
                command.map_or(fxconv::PairsCommand::List, Into::into),
            ),
            Commands::ClearCache => fxconv::AppCommand::ClearCache,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let options = fxconv::RunOptions {
        config_path: cli.config_path.as_deref(),
        no_persist: cli.no_persist,
    };
    let result = match cli.command {
        Some(Commands::Setup) => fxconv::cli::setup::setup(),
        Some(cmd) => fxconv::run_command(cmd.into(), options).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
