use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::HIDDEN_COLUMNS_KEY;
use crate::error::StorageError;
use crate::filters::FilterDictionary;
use crate::format;
use crate::model::StockRecord;
use crate::sort::{SortField, SortState};
use crate::storage::{load_json, save_json, KeyValueStore};

pub type Movers = Vec<(String, f64)>;

/// Result-table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Column {
    Symbol,
    Name,
    Price,
    PercentChange,
    Volume,
    MarketCap,
    FiftyTwoWeekHigh,
    FiftyTwoWeekLow,
    Eps,
    Sector,
    Industry,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::Symbol,
        Column::Name,
        Column::Price,
        Column::PercentChange,
        Column::Volume,
        Column::MarketCap,
        Column::FiftyTwoWeekHigh,
        Column::FiftyTwoWeekLow,
        Column::Eps,
        Column::Sector,
        Column::Industry,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Column::Symbol => "Symbol",
            Column::Name => "Name",
            Column::Price => "Price",
            Column::PercentChange => "Change",
            Column::Volume => "Volume",
            Column::MarketCap => "Market Cap",
            Column::FiftyTwoWeekHigh => "52W High",
            Column::FiftyTwoWeekLow => "52W Low",
            Column::Eps => "EPS",
            Column::Sector => "Sector",
            Column::Industry => "Industry",
        }
    }

    /// Sort field behind a clickable header.
    pub fn sort_field(self) -> Option<SortField> {
        match self {
            Column::Name => Some(SortField::Name),
            Column::Price => Some(SortField::Price),
            Column::PercentChange => Some(SortField::PercentChange),
            Column::Volume => Some(SortField::Volume),
            Column::MarketCap => Some(SortField::MarketCap),
            _ => None,
        }
    }

    pub fn cell(self, record: &StockRecord) -> String {
        match self {
            Column::Symbol => record.symbol.clone(),
            Column::Name => format::text(record.display_name()),
            Column::Price => format::price(record.price),
            Column::PercentChange => format::percent(record.percent_change),
            Column::Volume => format::compact(record.effective_volume()),
            Column::MarketCap => format::compact(record.market_cap),
            Column::FiftyTwoWeekHigh => format::price(record.fifty_two_week_high),
            Column::FiftyTwoWeekLow => format::price(record.fifty_two_week_low),
            Column::Eps => format::price(record.eps),
            Column::Sector => format::text(record.sector.as_deref()),
            Column::Industry => format::text(record.industry.as_deref()),
        }
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        Column::ALL
            .into_iter()
            .find(|column| {
                let label: String = column
                    .label()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .collect::<String>()
                    .to_ascii_lowercase();
                let name = format!("{column:?}").to_ascii_lowercase();
                needle == label || needle == name
            })
            .ok_or_else(|| format!("unknown column `{s}`"))
    }
}

/// Owned screener view state: fetched rows, ordering, active filters and
/// column visibility persisted through the injected store.
#[derive(Debug, Clone)]
pub struct ScreenerState<S> {
    store: S,
    records: Vec<StockRecord>,
    sort: SortState,
    filters: FilterDictionary,
    hidden_columns: BTreeSet<Column>,
}

impl<S: KeyValueStore> ScreenerState<S> {
    pub fn new(store: S) -> Self {
        let hidden_columns = match load_json::<Vec<Column>, _>(&store, HIDDEN_COLUMNS_KEY) {
            Ok(columns) => columns.unwrap_or_default().into_iter().collect(),
            Err(err) => {
                log::warn!(target: "screener.columns", "ignoring stored column visibility: {err}");
                BTreeSet::new()
            }
        };

        Self {
            store,
            records: Vec::new(),
            sort: SortState::default(),
            filters: FilterDictionary::new(),
            hidden_columns,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Replace the rows with a fresh response; source order is kept for the unsorted view.
    pub fn set_records(&mut self, records: Vec<StockRecord>) {
        self.records = records;
    }

    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
    }

    /// Rows in display order.
    pub fn rows(&self) -> Vec<StockRecord> {
        self.sort.apply(&self.records)
    }

    pub fn filters(&self) -> &FilterDictionary {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterDictionary {
        &mut self.filters
    }

    pub fn reset_filters(&mut self) {
        self.filters.clear();
    }

    pub fn is_column_visible(&self, column: Column) -> bool {
        !self.hidden_columns.contains(&column)
    }

    pub fn visible_columns(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|column| self.is_column_visible(*column))
            .collect()
    }

    /// Flip a column's visibility, persist it and return the new visibility.
    ///
    /// Nothing changes when the store rejects the write.
    pub fn toggle_column(&mut self, column: Column) -> Result<bool, StorageError> {
        let mut hidden = self.hidden_columns.clone();
        let visible = if hidden.remove(&column) {
            true
        } else {
            hidden.insert(column);
            false
        };
        let stored: Vec<Column> = hidden.iter().copied().collect();
        save_json(&mut self.store, HIDDEN_COLUMNS_KEY, &stored)?;
        self.hidden_columns = hidden;
        Ok(visible)
    }

    /// Top gainers and losers by percent change among the current rows.
    pub fn movers(&self, count: usize) -> (Movers, Movers) {
        movers(&self.records, count)
    }
}

pub fn movers(records: &[StockRecord], count: usize) -> (Movers, Movers) {
    if count == 0 || records.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let mut changes: Vec<(String, f64)> = records
        .iter()
        .filter_map(|record| {
            record
                .percent_change
                .filter(|change| change.is_finite())
                .map(|change| (record.symbol.clone(), change))
        })
        .collect();

    changes.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let gainers = changes
        .iter()
        .filter(|(_, change)| *change > 0.0)
        .take(count)
        .cloned()
        .collect::<Vec<_>>();

    let losers = changes
        .into_iter()
        .rev()
        .filter(|(_, change)| *change < 0.0)
        .take(count)
        .collect::<Vec<_>>();

    (gainers, losers)
}
