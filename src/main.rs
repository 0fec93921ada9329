use clap::Parser;
use nodebot_client::cli::dispatcher::Dispatcher;
use nodebot_client::cli::main_types::Cli;
use nodebot_client::storage::config::Config;
use nodebot_client::utils::logging::init_cli_logger;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_cli_logger(cli.verbose);

    let config_path = match Config::file_path_in(cli.config_dir.as_deref().map(Path::new)) {
        Ok(path) => Some(path),
        Err(err) => {
            tracing::warn!("{}; settings file disabled", err);
            None
        }
    };

    let loaded = match &config_path {
        Some(path) => Config::load(Some(path.clone())),
        None => Ok(Config::default()),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading config: {}", err);
            std::process::exit(1);
        }
    };

    let mut dispatcher = Dispatcher::new(config, config_path, cli.profile, cli.base_url);

    if let Err(e) = dispatcher.dispatch(cli.command).await {
        eprintln!("Error: {}", e);
        if let Some(hint) = e.troubleshooting_hint() {
            eprintln!("Hint: {}", hint);
        }
        std::process::exit(1);
    }

    Ok(())
}
