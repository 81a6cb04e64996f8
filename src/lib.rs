//! Stock screening core: record sorting, screener filter dictionaries,
//! persisted view state and local watchlists.

pub mod collections;
pub mod constants;
pub mod error;
pub mod filters;
pub mod format;
pub mod model;
pub mod screener;
pub mod sort;
pub mod storage;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod client;
#[cfg(feature = "cli")]
pub mod commands;
#[cfg(feature = "cli")]
pub mod logging;

pub use collections::{Collection, CollectionStore};
pub use error::{CollectionError, FilterError, StorageError};
pub use filters::{FilterCriterion, FilterDictionary, FilterKey, Operator};
pub use model::{ScreenResponse, Sector, StockRecord};
pub use screener::{Column, ScreenerState};
pub use sort::{next_direction, sort_records, SortDirection, SortField, SortState};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
