pub mod collections;
pub mod dashboard;
pub mod filters;
pub mod stock_table;
pub mod summary;
