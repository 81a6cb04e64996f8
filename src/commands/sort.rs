use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;

use crate::model::{ScreenResponse, StockRecord};
use crate::screener::Column;
use crate::sort::{sort_records, SortDirection, SortField, SortState};

use super::table;

#[derive(Debug, Args, Clone)]
pub struct SortArgs {
    /// JSON file holding an array of stocks or a `{ "stocks": [...] }` response
    pub input: PathBuf,

    /// Sort column: name, price, percent-change, volume, market-cap
    #[arg(long)]
    pub by: SortField,

    /// Sort direction: asc (default) or desc
    #[arg(long)]
    pub order: Option<SortDirection>,

    /// Print at most this many rows
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordsFile {
    List(Vec<StockRecord>),
    Envelope(ScreenResponse),
}

pub fn parse_records(raw: &str) -> Result<Vec<StockRecord>> {
    let parsed: RecordsFile = serde_json::from_str(raw).context("input is not a stock list")?;
    Ok(match parsed {
        RecordsFile::List(stocks) => stocks,
        RecordsFile::Envelope(response) => response.stocks,
    })
}

pub async fn run(args: SortArgs) -> Result<()> {
    let raw = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let records = parse_records(&raw)?;

    let direction = args.order.unwrap_or(SortDirection::Ascending);
    let mut rows = sort_records(&records, args.by, direction);
    if let Some(limit) = args.limit {
        rows.truncate(limit);
    }

    let columns = [
        Column::Symbol,
        Column::Name,
        Column::Price,
        Column::PercentChange,
        Column::Volume,
        Column::MarketCap,
    ];
    print!(
        "{}",
        table::render(&rows, &columns, SortState::new(args.by, direction))
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_list_and_envelope() {
        let list = parse_records(r#"[{"symbol":"a"},{"symbol":"b"}]"#).expect("list");
        assert_eq!(list.len(), 2);

        let envelope = parse_records(r#"{"stocks":[{"symbol":"c","price":"3.5"}]}"#)
            .expect("envelope");
        assert_eq!(envelope[0].symbol, "C");
        assert_eq!(envelope[0].price, Some(3.5));

        assert!(parse_records("42").is_err());
    }
}
