use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxdesk::core::CurrencyCode;
use fxdesk::core::expenses::ExpenseItem;
use fxdesk::core::history::MAX_HISTORY_DAYS;
use fxdesk::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxdesk::AppCommand {
    fn from(cmd: Commands) -> fxdesk::AppCommand {
        match cmd {
            Commands::Currencies => fxdesk::AppCommand::Currencies,
            Commands::Rates { base, json } => fxdesk::AppCommand::Rates { base, json },
            Commands::Convert {
                amount,
                from,
                to,
                swap,
            } => fxdesk::AppCommand::Convert {
                amount,
                from,
                to,
                swap,
            },
            Commands::History {
                from,
                to,
                days,
                json,
            } => fxdesk::AppCommand::History {
                from,
                to,
                days,
                json,
            },
            Commands::Expenses { from, to, items } => {
                fxdesk::AppCommand::Expenses { from, to, items }
            }
            Commands::Favorites => fxdesk::AppCommand::Favorites,
            Commands::Insights { from, to } => fxdesk::AppCommand::Insights { from, to },
            Commands::Chat { message } => fxdesk::AppCommand::Chat { message },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List supported currencies
    Currencies,
    /// Show exchange rates against a base currency
    Rates {
        /// Base currency (defaults to the configured one)
        #[arg(short, long)]
        base: Option<CurrencyCode>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Convert an amount between two currencies
    Convert {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        #[arg(short, long)]
        from: Option<CurrencyCode>,
        #[arg(short, long)]
        to: Option<CurrencyCode>,
        /// Exchange the from and to currencies
        #[arg(short, long)]
        swap: bool,
    },
    /// Show a simulated rate history
    History {
        #[arg(short, long)]
        from: Option<CurrencyCode>,
        #[arg(short, long)]
        to: Option<CurrencyCode>,
        /// Number of days, at most 3650 (defaults to history_days from config)
        #[arg(
            short,
            long,
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_HISTORY_DAYS))
        )]
        days: Option<u32>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Total travel expenses and convert them
    Expenses {
        #[arg(short, long)]
        from: Option<CurrencyCode>,
        #[arg(short, long)]
        to: Option<CurrencyCode>,
        /// An expense as NAME=AMOUNT; repeat for more items
        #[arg(short, long = "item", required = true)]
        items: Vec<ExpenseItem>,
    },
    /// Show favorite pairs with their current rates
    Favorites,
    /// Ask the AI assistant about a currency pair
    Insights {
        #[arg(short, long)]
        from: Option<CurrencyCode>,
        #[arg(short, long)]
        to: Option<CurrencyCode>,
    },
    /// Chat with the AI assistant; without a message, starts an interactive session
    Chat { message: Option<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxdesk::cli::setup::setup(),
        Some(cmd) => fxdesk::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
