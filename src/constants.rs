pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";
pub const SCREENER_PATH: &str = "screener";
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
pub const SEARCH_DEBOUNCE_MS: u32 = 300;
pub const DEFAULT_STORE_PATH: &str = "screener_store.json";
pub const HIDDEN_COLUMNS_KEY: &str = "screener.hidden_columns";
pub const COLLECTIONS_KEY: &str = "screener.collections";
pub const MOVERS_COUNT: usize = 3;
