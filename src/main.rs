use clap::Parser;
use tracing_subscriber::EnvFilter;

use sitebeacon::cli::{Cli, run_cli_command};
use sitebeacon::config;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    config::init_config();

    // RUST_LOG overrides the configured level
    let level = config::get_config().logging.level.clone();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run_cli_command(cli.command).await {
        eprintln!("{}", e.format_colored());
        std::process::exit(1);
    }
}
