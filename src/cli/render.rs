//! Render command implementation

use super::{chain_query, load_chain};
use crate::config::Config;
use crate::dashboard::ChartView;
use crate::render::Frame;
use crate::scale::Viewport;
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Output SVG file
    #[arg(short, long, default_value = "options-chain.svg")]
    pub output: PathBuf,

    /// Chart width in pixels (defaults to chart.width)
    #[arg(long)]
    pub width: Option<f64>,

    /// Chart height in pixels (defaults to chart.height)
    #[arg(long)]
    pub height: Option<f64>,

    /// Underlying ticker (defaults to OPTIONS_TICKER or api.ticker)
    #[arg(short, long)]
    pub ticker: Option<String>,

    /// Only contracts expiring on this date (YYYY-MM-DD)
    #[arg(short, long)]
    pub expiration: Option<NaiveDate>,

    /// Embed the entrance animation instead of the final frame
    #[arg(long)]
    pub animated: bool,
}

impl RenderArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let query = chain_query(config, self.ticker.as_deref(), self.expiration);
        let ticker = query.underlying_ticker.clone();
        let dataset = load_chain(config, query).await?;

        if dataset.is_empty() {
            anyhow::bail!("No Data Available: no options contracts found for {}", ticker);
        }

        let viewport = Viewport::new(
            self.width.unwrap_or(config.chart.width),
            self.height.unwrap_or(config.chart.height),
        )
        .with_margins(config.chart.margins);
        if !(viewport.width > 0.0 && viewport.height > 0.0) {
            anyhow::bail!("Chart dimensions must be positive");
        }

        let mut view = ChartView::new(&ticker, config.color_scale());
        view.update(&dataset, viewport)?;

        let frame = if self.animated { Frame::Animated } else { Frame::Final };
        let svg = view
            .to_svg(frame)
            .ok_or_else(|| anyhow::anyhow!("No scene to render"))?;
        std::fs::write(&self.output, svg)?;

        tracing::info!(
            ticker = %ticker,
            contracts = dataset.len(),
            output = %self.output.display(),
            "Rendered options chain"
        );
        println!("Wrote {} contracts to {}", dataset.len(), self.output.display());
        Ok(())
    }
}
