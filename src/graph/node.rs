//! Node and edge payloads for the trade graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in the trade graph.
///
/// `Time` and `Sell` share the same index domain but are distinct nodes:
/// a position closed at minute `t` cannot be reopened at minute `t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    /// Uninvested, free to buy at this minute
    Time(usize),
    /// Just sold at this minute
    Sell(usize),
}

impl Node {
    pub fn index(&self) -> usize {
        match *self {
            Node::Time(index) | Node::Sell(index) => index,
        }
    }

    pub fn is_sell(&self) -> bool {
        matches!(self, Node::Sell(_))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Time(index) => write!(f, "t{}", index),
            Node::Sell(index) => write!(f, "t{}:sell", index),
        }
    }
}

/// What an edge means
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeKind {
    /// Open at `buy_value`, close at `sell_value`
    Trade { buy_value: f64, sell_value: f64 },
    /// Stay out of the market for one minute
    Wait,
    /// Become eligible to buy the minute after a sale
    Release,
}

/// Edge data in the trade graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeData {
    pub kind: EdgeKind,
    pub weight: f64,
}

impl EdgeData {
    pub fn trade(buy_value: f64, sell_value: f64) -> Self {
        Self {
            kind: EdgeKind::Trade {
                buy_value,
                sell_value,
            },
            weight: sell_value - buy_value,
        }
    }

    pub fn wait() -> Self {
        Self {
            kind: EdgeKind::Wait,
            weight: 0.0,
        }
    }

    pub fn release() -> Self {
        Self {
            kind: EdgeKind::Release,
            weight: 0.0,
        }
    }

    pub fn is_trade(&self) -> bool {
        matches!(self.kind, EdgeKind::Trade { .. })
    }
}

/// Admissible hold durations in minutes, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldWindow {
    pub min: usize,
    pub max: usize,
}

impl HoldWindow {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Shortest series that can hold a single trade
    pub fn min_series_len(&self) -> usize {
        self.min + 1
    }

    /// Hold durations available to a position opened at `source` in a
    /// series of `len` samples. Shrinks near the tail so no sale lands
    /// past the last sample.
    pub fn durations(&self, source: usize, len: usize) -> std::ops::RangeInclusive<usize> {
        let last = len.saturating_sub(1);
        let upper = self.max.min(last.saturating_sub(source));
        self.min..=upper
    }
}

impl Default for HoldWindow {
    fn default() -> Self {
        Self::new(30, 59)
    }
}
