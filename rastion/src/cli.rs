use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use rastion_catalog::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, ItemKind};

const SHORT_HELP: &str = "Browse and download solvers and decision plugins from the Rastion Hub.";

#[derive(Debug, Parser)]
#[command(name = "rastion", about = SHORT_HELP)]
pub struct Cli {
    #[arg(help = "Base URL of the catalog service.")]
    #[arg(long, global = true, value_name = "URL")]
    pub catalog_url: Option<String>,
    #[arg(help = "Target a locally running backend instead of the production hub.")]
    #[arg(long, global = true)]
    pub dev: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Search the catalog.")]
    Search(SearchArgs),
    #[command(about = "Show one catalog entry in detail.")]
    Show(ItemArgs),
    #[command(about = "Download an entry's archive.")]
    Download(DownloadArgs),
    #[command(about = "Rate an entry from 0 to 5.")]
    Rate(RateArgs),
    #[command(subcommand, about = "Manage hub sign-in.")]
    Auth(AuthCommand),
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(help = "Free-text filter over names and descriptions.")]
    pub term: Option<String>,
    #[arg(help = "Search decision plugins instead of solvers.")]
    #[arg(long)]
    pub plugins: bool,
    #[arg(help = "Only show entries in this category.")]
    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<String>,
    #[arg(long, value_name = "N", default_value_t = DEFAULT_PAGE)]
    pub page: u32,
    #[arg(long, value_name = "N", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,
    #[arg(help = "Fetch one large page instead of paginating.")]
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct ItemArgs {
    #[arg(help = "Entry kind: 'solver' or 'plugin'.")]
    #[arg(value_parser = ItemKind::from_str)]
    pub kind: ItemKind,
    #[arg(help = "Numeric id of the entry.")]
    pub id: i64,
}

#[derive(Debug, Args)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub item: ItemArgs,
    #[arg(help = "Where to write the archive. Defaults to <name>-<version>.zip.")]
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RateArgs {
    #[command(flatten)]
    pub item: ItemArgs,
    #[arg(help = "Rating between 0 and 5.")]
    pub rating: f64,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    #[command(about = "Print the GitHub sign-in URL.")]
    Url,
    #[command(about = "Verify an access token and store it for future commands.")]
    Login(LoginArgs),
    #[command(about = "Forget the stored token.")]
    Logout,
    #[command(about = "Show the signed-in user.")]
    Status,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(help = "Access token obtained from the sign-in page; prompted for when omitted.")]
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,
}
