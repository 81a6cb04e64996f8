use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::model::StockRecord;

/// Columns the result table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Price,
    PercentChange,
    Volume,
    MarketCap,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Name,
        SortField::Price,
        SortField::PercentChange,
        SortField::Volume,
        SortField::MarketCap,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Price => "price",
            SortField::PercentChange => "percentChange",
            SortField::Volume => "volume",
            SortField::MarketCap => "marketCap",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "name" => Ok(SortField::Name),
            "price" => Ok(SortField::Price),
            "percentchange" | "change" => Ok(SortField::PercentChange),
            "volume" => Ok(SortField::Volume),
            "marketcap" => Ok(SortField::MarketCap),
            other => Err(format!("unknown sort field `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(format!("unknown sort direction `{other}`")),
        }
    }
}

/// Resolved comparison key for one record.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Text(Collation),
    Number(f64),
    Missing,
}

/// Case- and accent-insensitive text key: `Éclair` files next to `eclair`,
/// with the lowercased original breaking ties.
#[derive(Debug, Clone, PartialEq)]
struct Collation {
    folded: String,
    lowered: String,
}

impl Collation {
    fn new(text: &str) -> Self {
        let lowered = text.to_lowercase();
        let folded = lowered
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .collect();
        Self { folded, lowered }
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.folded
            .cmp(&other.folded)
            .then_with(|| self.lowered.cmp(&other.lowered))
    }
}

fn sort_key(record: &StockRecord, field: SortField) -> SortKey {
    let number = |value: Option<f64>| match value {
        Some(v) if !v.is_nan() => SortKey::Number(v),
        _ => SortKey::Missing,
    };

    match field {
        SortField::Name => record
            .display_name()
            .or_else(|| Some(record.symbol.trim()).filter(|symbol| !symbol.is_empty()))
            .map(|text| SortKey::Text(Collation::new(text)))
            .unwrap_or(SortKey::Missing),
        SortField::Price => number(record.price),
        SortField::PercentChange => number(record.percent_change),
        SortField::Volume => number(record.effective_volume()),
        SortField::MarketCap => number(record.market_cap),
    }
}

fn compare_keys(a: &SortKey, b: &SortKey, direction: SortDirection) -> Ordering {
    let ord = match (a, b) {
        // Missing values stay last whatever the direction.
        (SortKey::Missing, SortKey::Missing) => return Ordering::Equal,
        (SortKey::Missing, _) => return Ordering::Greater,
        (_, SortKey::Missing) => return Ordering::Less,
        (SortKey::Text(a), SortKey::Text(b)) => a.compare(b),
        (SortKey::Number(a), SortKey::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (SortKey::Text(_), SortKey::Number(_)) => Ordering::Less,
        (SortKey::Number(_), SortKey::Text(_)) => Ordering::Greater,
    };

    match direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
    }
}

/// Compare two records by `field`, keeping records without a value last.
pub fn compare_records(
    a: &StockRecord,
    b: &StockRecord,
    field: SortField,
    direction: SortDirection,
) -> Ordering {
    compare_keys(&sort_key(a, field), &sort_key(b, field), direction)
}

/// Return a sorted copy of `records`; the input slice is left untouched.
///
/// The sort is stable: records with equal keys keep their input order.
pub fn sort_records(
    records: &[StockRecord],
    field: SortField,
    direction: SortDirection,
) -> Vec<StockRecord> {
    let mut keyed: Vec<(SortKey, &StockRecord)> = records
        .iter()
        .map(|record| (sort_key(record, field), record))
        .collect();
    // `sort_by` is a stable merge sort.
    keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, direction));
    keyed.into_iter().map(|(_, record)| record.clone()).collect()
}

/// Direction after a header click.
///
/// A different column always starts ascending; the same column cycles
/// none -> asc -> desc -> none.
pub fn next_direction(
    current_field: Option<SortField>,
    clicked_field: SortField,
    current_direction: Option<SortDirection>,
) -> Option<SortDirection> {
    if current_field != Some(clicked_field) {
        return Some(SortDirection::Ascending);
    }

    match current_direction {
        None => Some(SortDirection::Ascending),
        Some(SortDirection::Ascending) => Some(SortDirection::Descending),
        Some(SortDirection::Descending) => None,
    }
}

/// Current ordering of the result table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: Option<SortField>,
    pub direction: Option<SortDirection>,
}

impl SortState {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self {
            field: Some(field),
            direction: Some(direction),
        }
    }

    pub fn is_sorted(&self) -> bool {
        self.active().is_some()
    }

    pub fn active(&self) -> Option<(SortField, SortDirection)> {
        self.field.zip(self.direction)
    }

    /// Direction shown for `field`'s header, if it is the sorted column.
    pub fn direction_for(&self, field: SortField) -> Option<SortDirection> {
        self.active()
            .and_then(|(active, direction)| (active == field).then_some(direction))
    }

    pub fn toggle(&mut self, field: SortField) {
        let direction = next_direction(self.field, field, self.direction);
        log::debug!(
            target: "sort.toggle",
            "sort on {field} -> {}",
            direction.map(SortDirection::as_str).unwrap_or("none")
        );
        *self = match direction {
            Some(direction) => SortState::new(field, direction),
            None => SortState::default(),
        };
    }

    /// Records in the current order, or in source order when unsorted.
    pub fn apply(&self, records: &[StockRecord]) -> Vec<StockRecord> {
        match self.active() {
            Some((field, direction)) => sort_records(records, field, direction),
            None => records.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(symbol: &str, price: Option<f64>) -> StockRecord {
        StockRecord {
            price,
            ..StockRecord::new(symbol)
        }
    }

    fn symbols(records: &[StockRecord]) -> Vec<&str> {
        records.iter().map(|record| record.symbol.as_str()).collect()
    }

    fn sample() -> Vec<StockRecord> {
        vec![
            priced("A", Some(100.0)),
            priced("B", None),
            priced("C", Some(50.0)),
        ]
    }

    #[test]
    fn price_ascending_keeps_missing_last() {
        let sorted = sort_records(&sample(), SortField::Price, SortDirection::Ascending);
        assert_eq!(symbols(&sorted), vec!["C", "A", "B"]);
    }

    #[test]
    fn price_descending_keeps_missing_last() {
        let sorted = sort_records(&sample(), SortField::Price, SortDirection::Descending);
        assert_eq!(symbols(&sorted), vec!["A", "C", "B"]);
    }

    #[test]
    fn input_is_not_mutated() {
        let input = sample();
        let before = input.clone();
        let _ = sort_records(&input, SortField::Price, SortDirection::Descending);
        assert_eq!(input, before);
    }

    #[test]
    fn sort_preserves_length_and_is_idempotent() {
        let input = vec![
            priced("D", Some(3.0)),
            priced("E", None),
            priced("F", Some(1.0)),
            priced("G", Some(3.0)),
            priced("H", None),
        ];
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let once = sort_records(&input, SortField::Price, direction);
            let twice = sort_records(&once, SortField::Price, direction);
            assert_eq!(once.len(), input.len());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let input: Vec<StockRecord> = (0..64)
            .map(|idx| priced(&format!("S{idx:02}"), Some((idx % 4) as f64)))
            .collect();

        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let sorted = sort_records(&input, SortField::Price, direction);
            for window in sorted.windows(2) {
                if window[0].price == window[1].price {
                    assert!(
                        window[0].symbol < window[1].symbol,
                        "{} and {} swapped",
                        window[0].symbol,
                        window[1].symbol
                    );
                }
            }
        }
    }

    #[test]
    fn missing_values_keep_input_order_among_themselves() {
        let input = vec![
            priced("Z", None),
            priced("A", Some(1.0)),
            priced("Y", None),
        ];
        let sorted = sort_records(&input, SortField::Price, SortDirection::Descending);
        assert_eq!(symbols(&sorted), vec!["A", "Z", "Y"]);
    }

    #[test]
    fn name_sort_is_case_insensitive_and_falls_back_to_symbol() {
        let input = vec![
            StockRecord {
                name: Some("beta corp".into()),
                ..StockRecord::new("BBB")
            },
            StockRecord::new("aaa"),
            StockRecord {
                short_name: Some("Alpha Inc".into()),
                ..StockRecord::new("ZZZ")
            },
            StockRecord::new(""),
        ];

        let sorted = sort_records(&input, SortField::Name, SortDirection::Ascending);
        assert_eq!(symbols(&sorted), vec!["AAA", "ZZZ", "BBB", ""]);

        let sorted = sort_records(&input, SortField::Name, SortDirection::Descending);
        assert_eq!(symbols(&sorted), vec!["BBB", "ZZZ", "AAA", ""]);
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        let named = |symbol: &str, name: &str| StockRecord {
            name: Some(name.into()),
            ..StockRecord::new(symbol)
        };
        let input = vec![
            named("Z", "Zeta Corp"),
            named("E", "Éclair SA"),
            named("A", "alpha Inc"),
            named("O", "Österreichische Post"),
            named("D", "eclair sa"),
        ];

        let sorted = sort_records(&input, SortField::Name, SortDirection::Ascending);
        assert_eq!(symbols(&sorted), vec!["A", "D", "E", "O", "Z"]);

        let sorted = sort_records(&input, SortField::Name, SortDirection::Descending);
        assert_eq!(symbols(&sorted), vec!["Z", "O", "E", "D", "A"]);
    }

    #[test]
    fn volume_uses_fallback_chain() {
        let input = vec![
            StockRecord {
                volume: Some(500.0),
                ..StockRecord::new("GEN")
            },
            StockRecord {
                regular_market_volume: Some(100.0),
                volume: Some(1_000.0),
                ..StockRecord::new("REG")
            },
            StockRecord {
                average_daily_volume_3_month: Some(300.0),
                ..StockRecord::new("AVG3")
            },
            StockRecord::new("NONE"),
        ];

        let sorted = sort_records(&input, SortField::Volume, SortDirection::Ascending);
        assert_eq!(symbols(&sorted), vec!["REG", "AVG3", "GEN", "NONE"]);
    }

    #[test]
    fn nan_is_treated_as_missing() {
        let input = vec![priced("NAN", Some(f64::NAN)), priced("ONE", Some(1.0))];
        let sorted = sort_records(&input, SortField::Price, SortDirection::Ascending);
        assert_eq!(symbols(&sorted), vec!["ONE", "NAN"]);
    }

    #[test]
    fn next_direction_cycles() {
        use SortDirection::*;
        use SortField::*;

        assert_eq!(next_direction(None, Price, None), Some(Ascending));
        assert_eq!(next_direction(Some(Price), Price, None), Some(Ascending));
        assert_eq!(next_direction(Some(Price), Price, Some(Ascending)), Some(Descending));
        assert_eq!(next_direction(Some(Price), Price, Some(Descending)), None);
        assert_eq!(next_direction(Some(Price), Volume, Some(Descending)), Some(Ascending));
    }

    #[test]
    fn toggle_clears_after_third_click() {
        let mut state = SortState::default();
        state.toggle(SortField::MarketCap);
        assert_eq!(state.direction_for(SortField::MarketCap), Some(SortDirection::Ascending));
        state.toggle(SortField::MarketCap);
        assert_eq!(state.direction_for(SortField::MarketCap), Some(SortDirection::Descending));
        state.toggle(SortField::MarketCap);
        assert!(!state.is_sorted());
        assert_eq!(state, SortState::default());
    }

    #[test]
    fn unsorted_state_returns_source_order() {
        let input = sample();
        assert_eq!(SortState::default().apply(&input), input);
    }

    #[test]
    fn fields_parse_from_cli_spellings() {
        assert_eq!("percent-change".parse(), Ok(SortField::PercentChange));
        assert_eq!("market_cap".parse(), Ok(SortField::MarketCap));
        assert_eq!("DESC".parse(), Ok(SortDirection::Descending));
        assert!("ticker".parse::<SortField>().is_err());
    }
}
