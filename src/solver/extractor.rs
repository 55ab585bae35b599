//! Trade Extraction
//!
//! Step 2.2: Reading trades back off the heaviest path. Every
//! `Time -> Sell` step is a realized trade; waits and releases are skipped.

use serde::Serialize;
use tracing::{debug, warn};

use super::Path;
use crate::graph::{EdgeKind, Node, TradeGraph};

/// A realized round trip
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trade {
    pub buy_value: f64,
    pub sell_value: f64,
    pub profit: f64,
    pub open_index: usize,
    pub close_index: usize,
}

impl Trade {
    /// Minutes the position was held
    pub fn hold_minutes(&self) -> usize {
        self.close_index - self.open_index
    }
}

pub struct TradeExtractor<'a> {
    graph: &'a TradeGraph,
}

impl<'a> TradeExtractor<'a> {
    pub fn new(graph: &'a TradeGraph) -> Self {
        Self { graph }
    }

    /// Trades along `path` in time order, plus their summed profit
    pub fn extract(&self, path: &Path) -> (Vec<Trade>, f64) {
        let mut trades = Vec::new();
        let mut total_profit = 0.0;

        for (from, to) in path.steps() {
            let (Node::Time(open_index), Node::Sell(close_index)) = (from, to) else {
                continue;
            };

            let Some(edge) = self.graph.edge_between(from, to) else {
                warn!("Path step {} -> {} has no trade edge, skipping", from, to);
                continue;
            };
            let EdgeKind::Trade {
                buy_value,
                sell_value,
            } = edge.kind
            else {
                continue;
            };

            let trade = Trade {
                buy_value,
                sell_value,
                profit: edge.weight,
                open_index,
                close_index,
            };
            debug!(
                "Trade {}: {} -> {} held {}m, profit {}",
                trades.len(),
                open_index,
                close_index,
                trade.hold_minutes(),
                trade.profit
            );

            total_profit += trade.profit;
            trades.push(trade);
        }

        (trades, total_profit)
    }
}
