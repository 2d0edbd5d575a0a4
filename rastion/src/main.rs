mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use rastion_catalog::HubClient;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Cli::parse();
    debug!("{args:?}");

    let mut config = config::Config::load()?;
    if args.catalog_url.is_some() {
        config.catalog_url = args.catalog_url.clone();
    }
    if args.dev {
        config.dev = true;
    }

    let client = HubClient::new(config.client_config())?;
    debug!(base_url = client.base_url(), "hub client ready");

    match args.command {
        cli::Command::Search(search_args) => commands::search(&client, search_args).await,
        cli::Command::Show(item_args) => commands::show(&client, item_args).await,
        cli::Command::Download(download_args) => commands::download(&client, download_args).await,
        cli::Command::Rate(rate_args) => commands::rate(&client, rate_args).await,
        cli::Command::Auth(auth_command) => commands::auth(&client, &config, auth_command).await,
    }
}
