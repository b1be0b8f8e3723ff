use anyhow::Context;
use clap::Parser;
use urban_forecast::config::build_storage;
use urban_forecast::server::run_server;
use urban_forecast::utils::{logger, validation::Validate};
use urban_forecast::{CliConfig, ReportEngine};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting urban-forecast {}", env!("CARGO_PKG_VERSION"));
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(
                "Configuration failed: {} (category: {:?}, severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Suggestion: {}", e.recovery_suggestion());
            eprintln!("{}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let storage = build_storage(&config)
        .await
        .context("failed to initialise dataset storage")?;
    let engine = ReportEngine::new(storage);

    run_server(config, engine)
        .await
        .context("HTTP server terminated with an error")?;

    tracing::info!("Server stopped");
    Ok(())
}
