use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use crate::client::{ClientConfig, ScreenerClient};
use crate::filters::{operands, FilterCriterion, FilterDictionary, RangeWarning};
use crate::logging;
use crate::model::Sector;
use crate::screener::ScreenerState;
use crate::sort::{SortDirection, SortField, SortState};
use crate::storage::FileStore;

use super::table;

#[derive(Debug, Args, Clone, Default)]
pub struct ScreenArgs {
    /// Restrict to a sector (repeatable), e.g. --sector Technology --sector Energy
    #[arg(long = "sector")]
    pub sectors: Vec<String>,

    /// Industry name fragment
    #[arg(long)]
    pub industry: Option<String>,

    /// Ticker fragment
    #[arg(long)]
    pub ticker: Option<String>,

    #[arg(long)]
    pub min_price: Option<f64>,
    #[arg(long)]
    pub max_price: Option<f64>,

    #[arg(long)]
    pub min_market_cap: Option<f64>,
    #[arg(long)]
    pub max_market_cap: Option<f64>,

    #[arg(long)]
    pub min_volume: Option<f64>,
    #[arg(long)]
    pub max_volume: Option<f64>,

    /// Minimum percent change, e.g. -5
    #[arg(long, allow_negative_numbers = true)]
    pub min_change: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub max_change: Option<f64>,

    /// Extra criterion as operand:operator:value (repeatable), e.g. eps:gte:5
    #[arg(long = "filter", value_parser = FilterCriterion::parse_expression)]
    pub filters: Vec<FilterCriterion>,

    /// Sort column: name, price, percent-change, volume, market-cap
    #[arg(long)]
    pub sort: Option<SortField>,

    /// Sort direction: asc (default) or desc
    #[arg(long)]
    pub order: Option<SortDirection>,

    /// Print at most this many rows
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Print the request body instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

/// Translate command-line flags into the filter dictionary, returning the
/// range warnings alongside.
pub fn build_filters(args: &ScreenArgs) -> (FilterDictionary, Vec<(String, RangeWarning)>) {
    let mut filters = FilterDictionary::new();

    let sectors = args.sectors.iter().map(|sector| {
        Sector::from_label(sector)
            .map(|known| known.label().to_string())
            .unwrap_or_else(|| sector.trim().to_string())
    });
    filters.reconcile_categories(operands::SECTOR, sectors);

    if let Some(industry) = &args.industry {
        filters.set_text(operands::INDUSTRY, industry);
    }
    if let Some(ticker) = &args.ticker {
        filters.set_text(operands::SYMBOL, &ticker.to_uppercase());
    }

    let ranges = [
        (operands::PRICE, args.min_price, args.max_price),
        (operands::MARKET_CAP, args.min_market_cap, args.max_market_cap),
        (operands::VOLUME, args.min_volume, args.max_volume),
        (operands::PERCENT_CHANGE, args.min_change, args.max_change),
    ];
    let mut warnings = Vec::new();
    for (operand, min, max) in ranges {
        if min.is_none() && max.is_none() {
            continue;
        }
        if let Some(warning) = filters.set_range(operand, min, max).warning {
            warnings.push((operand.to_string(), warning));
        }
    }

    for criterion in &args.filters {
        filters.add(criterion.clone());
    }

    (filters, warnings)
}

pub async fn run(args: ScreenArgs, api: String, store_path: &Path) -> Result<()> {
    let (filters, warnings) = build_filters(&args);
    for (operand, warning) in &warnings {
        logging::warn(
            "filters.range",
            &warning.message(operand),
            json!({ "operand": operand, "warning": warning }),
        );
    }

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&filters)?);
        return Ok(());
    }

    let client = ScreenerClient::new(ClientConfig {
        base_url: api,
        ..ClientConfig::default()
    })
    .context("failed to build HTTP client")?;

    logging::info(
        "screen.request",
        "posting screener filters",
        json!({ "endpoint": client.endpoint(), "filters": filters.len() }),
    );
    let stocks = client
        .screen(&filters)
        .await
        .with_context(|| format!("screening request to {} failed", client.endpoint()))?;

    let mut state = ScreenerState::new(FileStore::new(store_path));
    *state.filters_mut() = filters;
    state.set_records(stocks);
    if let Some(field) = args.sort {
        state.set_sort(SortState::new(
            field,
            args.order.unwrap_or(SortDirection::Ascending),
        ));
    }

    let mut rows = state.rows();
    if let Some(limit) = args.limit {
        rows.truncate(limit);
    }

    print!("{}", table::render(&rows, &state.visible_columns(), state.sort()));
    println!("{} of {} stocks", rows.len(), state.records().len());
    Ok(())
}
