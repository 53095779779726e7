pub mod cli;
pub mod core;
pub mod providers;

use crate::core::CurrencyCode;
use crate::core::config::AppConfig;
use crate::core::expenses::ExpenseItem;
use crate::providers::mock::MockRateProvider;
use anyhow::Result;
use tracing::{debug, info};

/// A subcommand to run. Currency options left as `None` fall back to the
/// configured base and target currencies.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Currencies,
    Rates {
        base: Option<CurrencyCode>,
        json: bool,
    },
    Convert {
        amount: f64,
        from: Option<CurrencyCode>,
        to: Option<CurrencyCode>,
        swap: bool,
    },
    History {
        from: Option<CurrencyCode>,
        to: Option<CurrencyCode>,
        days: Option<u32>,
        json: bool,
    },
    Expenses {
        from: Option<CurrencyCode>,
        to: Option<CurrencyCode>,
        items: Vec<ExpenseItem>,
    },
    Favorites,
    Insights {
        from: Option<CurrencyCode>,
        to: Option<CurrencyCode>,
    },
    Chat {
        message: Option<String>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxdesk starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };

    let table = config.rate_table()?;
    let provider = MockRateProvider::new(table.clone())
        .with_latency(config.mock_latency())
        .with_policy(config.missing_rate_policy);
    let base = config.base_currency();
    let target = config.target_currency;
    debug!(%base, %target, currencies = table.len(), "Loaded config");

    match command {
        AppCommand::Currencies => {
            cli::currencies::run(&table);
            Ok(())
        }
        AppCommand::Rates { base: chosen, json } => {
            cli::rates::run(&provider, chosen.unwrap_or(base), json).await
        }
        AppCommand::Convert {
            amount,
            from,
            to,
            swap,
        } => {
            let (mut from, mut to) = (from.unwrap_or(base), to.unwrap_or(target));
            if swap {
                std::mem::swap(&mut from, &mut to);
            }
            cli::convert::run(&provider, amount, from, to).await
        }
        AppCommand::History {
            from,
            to,
            days,
            json,
        } => {
            cli::history::run(
                &provider,
                from.unwrap_or(base),
                to.unwrap_or(target),
                days.unwrap_or(config.history_days),
                json,
            )
            .await
        }
        AppCommand::Expenses { from, to, items } => {
            cli::expenses::run(&provider, from.unwrap_or(base), to.unwrap_or(target), &items)
                .await
        }
        AppCommand::Favorites => cli::favorites::run(&provider, &config.favorites()?).await,
        AppCommand::Insights { from, to } => {
            let ai = config.ai_capability()?;
            cli::insights::run(&provider, &ai, from.unwrap_or(base), to.unwrap_or(target)).await
        }
        AppCommand::Chat { message } => {
            let ai = config.ai_capability()?;
            cli::chat::run(&ai, message.as_deref()).await
        }
    }
}
