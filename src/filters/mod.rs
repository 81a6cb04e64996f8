pub mod criterion;
pub mod dictionary;
pub mod range;

pub use criterion::{FilterCriterion, FilterType, FilterValue, Operator};
pub use dictionary::{FilterDictionary, FilterKey, Reconciliation};
pub use range::{check_range, RangeUpdate, RangeWarning};

/// Operands understood by the screening endpoint.
pub mod operands {
    pub const SYMBOL: &str = "symbol";
    pub const SECTOR: &str = "sector";
    pub const INDUSTRY: &str = "industry";
    pub const EXCHANGE: &str = "exchange";
    pub const PRICE: &str = "price";
    pub const PERCENT_CHANGE: &str = "percentChange";
    pub const VOLUME: &str = "volume";
    pub const MARKET_CAP: &str = "marketCap";
    pub const EPS: &str = "eps";
}
