pub mod cli;
pub mod core;
pub mod providers;
pub mod service;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::pairs::PairList;
use crate::providers::RateProxyProvider;
use crate::service::CurrencyService;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum PairsCommand {
    List,
    Add { from: String, to: String, amount: f64 },
    Remove { from: String, to: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Currencies { base: Option<String> },
    Convert { amount: f64, from: String, to: String },
    Pairs(PairsCommand),
    ClearCache,
}

/// Options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct RunOptions<'a> {
    pub config_path: Option<&'a str>,
    /// Keep the pair cache and configured pairs in memory only.
    pub no_persist: bool,
}

pub async fn run_command(command: AppCommand, options: RunOptions<'_>) -> Result<()> {
    info!("fxconv starting...");

    let config = match options.config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let persist = config.persist_cache && !options.no_persist;
    let storage = store::open_storage(&config, persist)?;
    let provider = RateProxyProvider::new(&config.proxy.base_url)?;
    let service = CurrencyService::with_storage(provider, Arc::clone(&storage));

    match command {
        AppCommand::Currencies { base } => {
            let base = base.as_deref().unwrap_or(&config.base_currency);
            cli::currencies::run(&service, base).await
        }
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(&service, amount, &from, &to).await
        }
        AppCommand::ClearCache => {
            let cleared = service.cached_pairs().await;
            service.clear_cache().await;
            println!("Cleared {cleared} cached rates");
            Ok(())
        }
        AppCommand::Pairs(pairs_command) => {
            let mut pairs = PairList::load(storage, &config.pairs)?;
            match pairs_command {
                PairsCommand::List => cli::pairs::list(&service, &pairs).await,
                PairsCommand::Add { from, to, amount } => {
                    cli::pairs::add(&mut pairs, &from, &to, amount)
                }
                PairsCommand::Remove { from, to } => cli::pairs::remove(&mut pairs, &from, &to),
            }
        }
    }
}
