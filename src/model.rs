use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Sector classification offered as categoric screener filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Technology,
    Healthcare,
    FinancialServices,
    ConsumerCyclical,
    ConsumerDefensive,
    CommunicationServices,
    Industrials,
    Energy,
    Utilities,
    BasicMaterials,
    RealEstate,
}

impl Sector {
    pub const ALL: [Sector; 11] = [
        Sector::Technology,
        Sector::Healthcare,
        Sector::FinancialServices,
        Sector::ConsumerCyclical,
        Sector::ConsumerDefensive,
        Sector::CommunicationServices,
        Sector::Industrials,
        Sector::Energy,
        Sector::Utilities,
        Sector::BasicMaterials,
        Sector::RealEstate,
    ];

    /// Label used both for display and as the category sent to the screener.
    pub fn label(self) -> &'static str {
        match self {
            Sector::Technology => "Technology",
            Sector::Healthcare => "Healthcare",
            Sector::FinancialServices => "Financial Services",
            Sector::ConsumerCyclical => "Consumer Cyclical",
            Sector::ConsumerDefensive => "Consumer Defensive",
            Sector::CommunicationServices => "Communication Services",
            Sector::Industrials => "Industrials",
            Sector::Energy => "Energy",
            Sector::Utilities => "Utilities",
            Sector::BasicMaterials => "Basic Materials",
            Sector::RealEstate => "Real Estate",
        }
    }

    pub fn from_label(label: &str) -> Option<Sector> {
        let needle = label.trim();
        Sector::ALL
            .into_iter()
            .find(|sector| sector.label().eq_ignore_ascii_case(needle))
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Quote row returned by the screening API.
///
/// Every field except the symbol may be missing. Decoding goes through
/// [`WireRecord`], which also accepts quote-style names such as
/// `regularMarketPrice`; serialization always uses the canonical names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "WireRecord")]
pub struct StockRecord {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_market_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_daily_volume_3_month: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
}

/// Wire shape of a quote row. Canonical and quote-style names are separate
/// fields so a payload carrying both never fails as a duplicate.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireRecord {
    #[serde(deserialize_with = "uppercase_symbol")]
    symbol: String,
    name: Option<String>,
    display_name: Option<String>,
    short_name: Option<String>,
    long_name: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    price: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    regular_market_price: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    percent_change: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    regular_market_change_percent: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    regular_market_volume: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    average_daily_volume_3_month: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    average_volume: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    volume: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    market_cap: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    market_capitalization: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    fifty_two_week_high: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    fifty_two_week_low: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    eps: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    eps_trailing_twelve_months: Option<f64>,
    sector: Option<String>,
    industry: Option<String>,
    exchange: Option<String>,
}

impl From<WireRecord> for StockRecord {
    fn from(wire: WireRecord) -> Self {
        let name = wire
            .name
            .filter(|name| !name.trim().is_empty())
            .or(wire.display_name);

        StockRecord {
            symbol: wire.symbol,
            name,
            short_name: wire.short_name,
            long_name: wire.long_name,
            price: wire.price.or(wire.regular_market_price),
            percent_change: wire.percent_change.or(wire.regular_market_change_percent),
            regular_market_volume: wire.regular_market_volume,
            average_daily_volume_3_month: wire.average_daily_volume_3_month,
            average_volume: wire.average_volume,
            volume: wire.volume,
            market_cap: wire.market_cap.or(wire.market_capitalization),
            fifty_two_week_high: wire.fifty_two_week_high,
            fifty_two_week_low: wire.fifty_two_week_low,
            eps: wire.eps.or(wire.eps_trailing_twelve_months),
            sector: wire.sector,
            industry: wire.industry,
            exchange: wire.exchange,
        }
    }
}

impl StockRecord {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            ..Self::default()
        }
    }

    /// First non-blank of `name`, `shortName`, `longName`.
    pub fn display_name(&self) -> Option<&str> {
        [&self.name, &self.short_name, &self.long_name]
            .into_iter()
            .filter_map(|candidate| candidate.as_deref())
            .map(str::trim)
            .find(|candidate| !candidate.is_empty())
    }

    /// Volume with the fallback chain: regular market, 3-month average,
    /// average, generic.
    pub fn effective_volume(&self) -> Option<f64> {
        self.regular_market_volume
            .or(self.average_daily_volume_3_month)
            .or(self.average_volume)
            .or(self.volume)
    }
}

/// Response envelope of the screening endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreenResponse {
    #[serde(default)]
    pub stocks: Vec<StockRecord>,
}

fn uppercase_symbol<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let symbol = Option::<String>::deserialize(deserializer)?;
    Ok(symbol.unwrap_or_default().trim().to_uppercase())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(number_from_value))
}

fn number_from_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().replace(',', "").parse::<f64>().ok(),
        Value::Object(map) => map.get("raw").and_then(number_from_value),
        _ => None,
    };
    parsed.filter(|number| number.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_deserializes_from_sample() {
        let json = r#"{
            "symbol": "aapl",
            "shortName": "Apple Inc.",
            "price": 189.84,
            "percentChange": "-1.25",
            "regularMarketVolume": null,
            "averageDailyVolume3Month": { "raw": 52000000, "fmt": "52M" },
            "marketCap": "2,950,000,000,000",
            "eps": "n/a",
            "sector": "Technology",
            "unknownField": [1, 2, 3]
        }"#;

        let record: StockRecord = serde_json::from_str(json).expect("valid record");
        assert_eq!(record.symbol, "AAPL");
        assert_eq!(record.display_name(), Some("Apple Inc."));
        assert_eq!(record.price, Some(189.84));
        assert_eq!(record.percent_change, Some(-1.25));
        assert_eq!(record.regular_market_volume, None);
        assert_eq!(record.effective_volume(), Some(52_000_000.0));
        assert_eq!(record.market_cap, Some(2_950_000_000_000.0));
        assert_eq!(record.eps, None);
        assert_eq!(record.sector.as_deref(), Some("Technology"));
    }

    #[test]
    fn quote_style_names_fill_canonical_fields() {
        let json = r#"{
            "symbol": "msft",
            "displayName": "Microsoft",
            "regularMarketPrice": 410.5,
            "regularMarketChangePercent": 1.2,
            "marketCapitalization": 3.0e12,
            "epsTrailingTwelveMonths": "11.1"
        }"#;

        let record: StockRecord = serde_json::from_str(json).expect("valid record");
        assert_eq!(record.symbol, "MSFT");
        assert_eq!(record.display_name(), Some("Microsoft"));
        assert_eq!(record.price, Some(410.5));
        assert_eq!(record.percent_change, Some(1.2));
        assert_eq!(record.market_cap, Some(3.0e12));
        assert_eq!(record.eps, Some(11.1));
    }

    #[test]
    fn canonical_name_wins_over_quote_style() {
        let json = r#"{
            "symbol": "KO",
            "price": 61.0,
            "regularMarketPrice": 60.0,
            "eps": null,
            "epsTrailingTwelveMonths": 2.5
        }"#;

        let record: StockRecord = serde_json::from_str(json).expect("both names accepted");
        assert_eq!(record.price, Some(61.0));
        assert_eq!(record.eps, Some(2.5));

        let reencoded = serde_json::to_value(&record).expect("serialize");
        assert_eq!(reencoded["price"], 61.0);
        assert!(reencoded.get("regularMarketPrice").is_none());
    }

    #[test]
    fn volume_fallback_prefers_regular_market() {
        let record = StockRecord {
            regular_market_volume: Some(10.0),
            average_daily_volume_3_month: Some(20.0),
            average_volume: Some(30.0),
            volume: Some(40.0),
            ..StockRecord::new("x")
        };
        assert_eq!(record.effective_volume(), Some(10.0));

        let record = StockRecord {
            average_volume: Some(30.0),
            volume: Some(40.0),
            ..StockRecord::new("x")
        };
        assert_eq!(record.effective_volume(), Some(30.0));
    }

    #[test]
    fn blank_names_are_skipped() {
        let record = StockRecord {
            name: Some("  ".into()),
            long_name: Some("Long Name".into()),
            ..StockRecord::new("x")
        };
        assert_eq!(record.display_name(), Some("Long Name"));
        assert_eq!(StockRecord::new("x").display_name(), None);
    }

    #[test]
    fn response_without_stocks_is_empty() {
        let response: ScreenResponse = serde_json::from_str("{}").expect("valid response");
        assert!(response.stocks.is_empty());
    }

    #[test]
    fn sector_labels_round_trip() {
        for sector in Sector::ALL {
            assert_eq!(Sector::from_label(sector.label()), Some(sector));
        }
        assert_eq!(Sector::from_label("financial services"), Some(Sector::FinancialServices));
        assert_eq!(Sector::from_label("Crypto"), None);
    }
}
