use clap::Parser;

use repair_estimates::AppState;
use repair_estimates::cli::{Cli, execute_command, init_logger_from_settings, load_and_merge_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match load_and_merge_config(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            std::process::exit(2);
        }
    };

    init_logger_from_settings(&settings)?;
    tracing::debug!(
        version = repair_estimates::pkg_version(),
        app = %settings.application.name,
        "starting"
    );

    let state = AppState::from_settings(&settings)?;

    match execute_command(cli.command, &state).await {
        Ok(rows) => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
