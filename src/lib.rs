//! Hindsight
//!
//! Finds the most profitable single-position buy/sell schedule over a minute
//! price series: build a time-ordered trade DAG, take its heaviest path, read
//! the trades back off it.

pub mod config;
pub mod graph;
pub mod pipeline;
pub mod report;
pub mod series;
pub mod solver;

pub use config::{Config, ReportFormat};
pub use graph::{BuildProgress, GraphBuilder, HoldWindow, Node, TradeGraph};
pub use pipeline::{plan, Shortfall, Strategy};
pub use series::{load_series, LoadError, PriceSeries};
pub use solver::{LongestPathSolver, Path, Trade, TradeExtractor};
