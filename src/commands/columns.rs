use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::screener::{Column, ScreenerState};
use crate::storage::FileStore;

#[derive(Debug, Args, Clone)]
pub struct ColumnsArgs {
    /// Flip visibility of a column (repeatable), e.g. --toggle eps
    #[arg(long)]
    pub toggle: Vec<Column>,
}

pub fn run(args: ColumnsArgs, store_path: &Path) -> Result<()> {
    let mut state = ScreenerState::new(FileStore::new(store_path));
    for column in args.toggle {
        state.toggle_column(column)?;
    }

    for column in Column::ALL {
        let mark = if state.is_column_visible(column) { "x" } else { " " };
        println!("[{mark}] {}", column.label());
    }
    Ok(())
}
