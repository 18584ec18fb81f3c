//! Stats command implementation

use super::{chain_query, load_chain};
use crate::chain::ChainStats;
use crate::config::Config;
use crate::interaction::format_thousands;
use chrono::NaiveDate;
use clap::Args;

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Underlying ticker (defaults to OPTIONS_TICKER or api.ticker)
    #[arg(short, long)]
    pub ticker: Option<String>,

    /// Only contracts expiring on this date (YYYY-MM-DD)
    #[arg(short, long)]
    pub expiration: Option<NaiveDate>,

    /// Output format: json or table
    #[arg(long, default_value = "table")]
    pub format: String,
}

impl StatsArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let query = chain_query(config, self.ticker.as_deref(), self.expiration);
        let ticker = query.underlying_ticker.clone();
        let dataset = load_chain(config, query).await?;
        let stats = ChainStats::from_contracts(&dataset);

        match self.format.as_str() {
            "json" => println!("{}", serde_json::to_string_pretty(&stats)?),
            "table" => print!("{}", format_table(&ticker, &stats)),
            other => anyhow::bail!("Unknown format: {} (expected json or table)", other),
        }
        Ok(())
    }
}

fn format_table(ticker: &str, stats: &ChainStats) -> String {
    let mut out = format!("{ticker} options chain\n");
    out.push_str(&format!(
        "  Total Contracts:     {}\n",
        format_thousands(stats.total_contracts as u64)
    ));
    out.push_str(&format!("  Call Options:        {}\n", format_thousands(stats.calls as u64)));
    out.push_str(&format!("  Put Options:         {}\n", format_thousands(stats.puts as u64)));
    out.push_str(&format!(
        "  Total Open Interest: {}\n",
        format_thousands(stats.total_open_interest)
    ));
    if stats.missing_open_interest > 0 {
        out.push_str(&format!(
            "  Missing OI:          {} contracts\n",
            stats.missing_open_interest
        ));
    }
    if let (Some(min), Some(max)) = (stats.min_strike, stats.max_strike) {
        out.push_str(&format!("  Strikes:             ${min} - ${max}\n"));
    }
    if let (Some(near), Some(far)) = (stats.nearest_expiration, stats.farthest_expiration) {
        out.push_str(&format!("  Expirations:         {near} - {far}\n"));
    }
    out
}
