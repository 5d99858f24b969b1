pub mod cell;
pub mod coerce;
pub mod spreadsheet;
pub mod normalizer;
pub mod deal;
pub mod order;
