use clap::Parser;
use options_scatter::cli::{show_config, Cli, Commands};
use options_scatter::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) if e.is_not_found() => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            Config::default()
        }
        Err(e) => return Err(e.into()),
    };
    config.apply_env(|key| std::env::var(key).ok());
    config.validate()?;

    // Initialize telemetry
    let _telemetry = options_scatter::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Render(args) => {
            tracing::info!("Rendering options chain");
            args.execute(&config).await?;
        }
        Commands::Stats(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => show_config(&config)?,
    }

    Ok(())
}
