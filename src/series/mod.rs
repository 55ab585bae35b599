//! Phase 0: Data Ingest
//!
//! Turns a delimited `timestamp,price` file into an in-memory price series.

mod loader;

pub use loader::{load_series, parse_series, LoadError, PriceSeries, Sample};
