use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use stock_screener::cli::{Cli, Command};
use stock_screener::commands::{columns, screen, sort, watchlist};
use stock_screener::logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });

    let result = match cli.command {
        Command::Screen(args) => screen::run(args, cli.api, &cli.store).await,
        Command::Sort(args) => sort::run(args).await,
        Command::Watchlist(args) => watchlist::run(args, &cli.store),
        Command::Columns(args) => columns::run(args, &cli.store),
    };

    if let Err(err) = &result {
        logging::error_simple("command.failed", &format!("{err:#}"));
    }
    result
}
