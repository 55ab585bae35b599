//! End-to-end planning: series -> graph -> path -> trades

use std::fmt;

use tracing::{info, warn};

use crate::graph::{BuildProgress, GraphBuilder, GraphStats, HoldWindow};
use crate::series::PriceSeries;
use crate::solver::{LongestPathSolver, Path, Trade, TradeExtractor};

/// Why a plan came back empty. Neither case is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortfall {
    /// Series too short for even one minimum-length hold
    InsufficientData { len: usize, required: usize },
    /// The solver had no nodes to work with
    EmptyGraph,
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shortfall::InsufficientData { len, required } => write!(
                f,
                "insufficient data: {} samples, at least {} needed for one trade",
                len, required
            ),
            Shortfall::EmptyGraph => write!(f, "empty graph: nothing to solve"),
        }
    }
}

/// The optimal schedule for one series
#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    pub trades: Vec<Trade>,
    pub total_profit: f64,
    pub path: Option<Path>,
    pub stats: GraphStats,
    pub shortfall: Option<Shortfall>,
}

impl Strategy {
    fn empty(stats: GraphStats, shortfall: Shortfall) -> Self {
        Self {
            trades: Vec::new(),
            total_profit: 0.0,
            path: None,
            stats,
            shortfall: Some(shortfall),
        }
    }
}

/// Build, solve and extract in one go
pub fn plan(
    series: &PriceSeries,
    window: HoldWindow,
    progress: Option<(usize, &mut dyn BuildProgress)>,
) -> Strategy {
    let mut builder = GraphBuilder::new(window);
    if let Some((interval, observer)) = progress {
        builder = builder.with_progress(interval, observer);
    }

    let graph = builder.build(series);
    let stats = graph.stats();

    if series.len() < window.min_series_len() {
        let shortfall = Shortfall::InsufficientData {
            len: series.len(),
            required: window.min_series_len(),
        };
        warn!("{}", shortfall);
        return Strategy::empty(stats, shortfall);
    }

    let Some(path) = LongestPathSolver::new(&graph).solve() else {
        warn!("{}", Shortfall::EmptyGraph);
        return Strategy::empty(stats, Shortfall::EmptyGraph);
    };

    let (trades, total_profit) = TradeExtractor::new(&graph).extract(&path);
    info!(
        "Planned {} trades for total profit {:.4}",
        trades.len(),
        total_profit
    );

    Strategy {
        trades,
        total_profit,
        path: Some(path),
        stats,
        shortfall: None,
    }
}
