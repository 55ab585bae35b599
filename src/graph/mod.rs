//! Phase 1: The Cartographer
//!
//! Responsible for:
//! - Turning a price series into a time-ordered trade DAG
//! - Keeping buy and sell points apart as distinct node kinds

mod builder;
mod node;

pub use builder::{BuildProgress, GraphBuilder, GraphStats, TradeGraph};
pub use node::{EdgeData, EdgeKind, HoldWindow, Node};
