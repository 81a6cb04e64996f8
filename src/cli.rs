use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::columns::ColumnsArgs;
use crate::commands::screen::ScreenArgs;
use crate::commands::sort::SortArgs;
use crate::commands::watchlist::WatchlistArgs;
use crate::constants::{DEFAULT_API_BASE_URL, DEFAULT_STORE_PATH};

#[derive(Debug, Parser)]
#[command(author, version, about = "Stock screener and watchlist client")]
pub struct Cli {
    /// Base URL of the screening API
    #[arg(long, global = true, env = "SCREENER_API_URL", default_value = DEFAULT_API_BASE_URL)]
    pub api: String,

    /// Local JSON store for watchlists and column visibility
    #[arg(long, global = true, env = "SCREENER_STORE", default_value = DEFAULT_STORE_PATH)]
    pub store: PathBuf,

    /// Emit debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Query the screening API with filters and print the sorted result
    Screen(ScreenArgs),
    /// Sort a local JSON file of stocks
    Sort(SortArgs),
    /// Manage locally stored collections
    Watchlist(WatchlistArgs),
    /// Show or toggle result-table columns
    Columns(ColumnsArgs),
}
