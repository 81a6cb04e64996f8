use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::collections::CollectionStore;
use crate::storage::FileStore;

#[derive(Debug, Args, Clone)]
pub struct WatchlistArgs {
    #[command(subcommand)]
    pub action: WatchlistAction,
}

#[derive(Debug, Subcommand, Clone)]
pub enum WatchlistAction {
    /// Show every collection and its symbols
    List,
    /// Create an empty collection
    Create { name: String },
    /// Delete a collection
    Delete { name: String },
    /// Add symbols to a collection
    Add {
        name: String,
        #[arg(required = true)]
        symbols: Vec<String>,
    },
    /// Remove symbols from a collection
    Remove {
        name: String,
        #[arg(required = true)]
        symbols: Vec<String>,
    },
}

pub fn run(args: WatchlistArgs, store_path: &Path) -> Result<()> {
    let mut collections = CollectionStore::open(FileStore::new(store_path))
        .with_context(|| format!("failed to open collections in {}", store_path.display()))?;

    match args.action {
        WatchlistAction::List => {
            if collections.list().is_empty() {
                println!("No collections yet");
            }
            for collection in collections.list() {
                println!("{:<20} {}", collection.name, collection.symbols.join(", "));
            }
        }
        WatchlistAction::Create { name } => {
            let created = collections.create(&name)?;
            println!("Created {}", created.name);
        }
        WatchlistAction::Delete { name } => {
            let removed = collections.delete(&name)?;
            println!("Deleted {} ({} symbols)", removed.name, removed.symbols.len());
        }
        WatchlistAction::Add { name, symbols } => {
            for symbol in &symbols {
                if !collections.add_symbol(&name, symbol)? {
                    println!("{} already in {name}", symbol.to_uppercase());
                }
            }
        }
        WatchlistAction::Remove { name, symbols } => {
            for symbol in &symbols {
                if !collections.remove_symbol(&name, symbol)? {
                    println!("{} not in {name}", symbol.to_uppercase());
                }
            }
        }
    }
    Ok(())
}
