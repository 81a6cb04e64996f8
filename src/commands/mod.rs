pub mod columns;
pub mod screen;
pub mod sort;
pub mod table;
pub mod watchlist;
