//! Phase 2: The Brain
//!
//! Responsible for:
//! - Finding the heaviest path through the trade DAG in one linear pass
//! - Reading the realized trades back off that path

mod extractor;
mod longest_path;

pub use extractor::{Trade, TradeExtractor};
pub use longest_path::{LongestPathSolver, Path, Relaxation};
