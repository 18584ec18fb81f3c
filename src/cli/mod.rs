//! CLI interface for options-scatter
//!
//! Provides subcommands for:
//! - `render`: Fetch the chain and write the scatter plot as SVG
//! - `stats`: Fetch the chain and print the stat-card numbers
//! - `config`: Show the effective configuration

mod render;
mod stats;

pub use render::RenderArgs;
pub use stats::StatsArgs;

use crate::chain::OptionContract;
use crate::config::Config;
use crate::fetch::{FetchStatus, OptionsDataStore};
use crate::polygon::{ChainQuery, PolygonClient};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "options-scatter")]
#[command(about = "Options chain scatter plot: strike vs expiration, sized by open interest")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the options chain and render it to SVG
    Render(RenderArgs),
    /// Fetch the options chain and print summary statistics
    Stats(StatsArgs),
    /// Show configuration
    Config,
}

/// Print the effective configuration with the credential redacted
pub fn show_config(config: &Config) -> anyhow::Result<()> {
    let mut shown = config.clone();
    shown.api.api_key = Some(config.redacted_api_key());
    println!("Current configuration:");
    print!("{}", toml::to_string_pretty(&shown)?);
    if !config.has_api_key() {
        println!();
        println!("No usable API key: set {} or api.api_key", crate::config::API_KEY_ENV);
    }
    Ok(())
}

/// Query for the configured ticker, with command-line overrides
fn chain_query(config: &Config, ticker: Option<&str>, expiration: Option<NaiveDate>) -> ChainQuery {
    let ticker = ticker.map_or_else(|| config.api.ticker.clone(), str::to_uppercase);
    let mut query = ChainQuery::new(ticker);
    query.expiration_date = expiration;
    query
}

/// Run one fetch cycle and return the normalized dataset
async fn load_chain(config: &Config, query: ChainQuery) -> anyhow::Result<Arc<[OptionContract]>> {
    let client = PolygonClient::with_config(config.polygon_config())?;
    let store = OptionsDataStore::new(client, query);
    store.fetch().await;

    match store.status() {
        FetchStatus::Ready(data) => Ok(data),
        FetchStatus::Error { message, .. } => anyhow::bail!("{}", message),
        FetchStatus::Loading => anyhow::bail!("Options chain request did not complete"),
    }
}
