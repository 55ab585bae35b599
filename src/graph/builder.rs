//! Graph Construction
//!
//! Step 1: The Map Maker
//!
//! Every admissible trade becomes a weighted edge from a time node to a
//! sell node. Zero-weight wait edges chain consecutive minutes together and
//! release edges let the position reopen the minute after a sale. Since
//! every edge moves forward in time, the result is a DAG by construction.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::{debug, info, trace};

use super::{EdgeData, EdgeKind, HoldWindow, Node};
use crate::series::PriceSeries;

/// Receives build progress at a caller-chosen cadence
pub trait BuildProgress {
    /// `processed` of `total` source minutes have been expanded
    fn on_progress(&mut self, processed: usize, total: usize);
}

impl<F> BuildProgress for F
where
    F: FnMut(usize, usize),
{
    fn on_progress(&mut self, processed: usize, total: usize) {
        self(processed, total)
    }
}

/// Node and edge counts for a built graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub sell_nodes: usize,
    pub trade_edges: usize,
    pub wait_edges: usize,
    pub release_edges: usize,
}

/// The trade graph for one price series
#[derive(Debug, Clone, Default)]
pub struct TradeGraph {
    pub graph: DiGraph<Node, EdgeData>,
    time_nodes: Vec<NodeIndex>,
    sell_nodes: Vec<Option<NodeIndex>>,
}

impl TradeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay down one time node per minute, chained by wait edges
    fn with_wait_chain(len: usize) -> Self {
        let mut graph = Self {
            graph: DiGraph::with_capacity(len, len * 2),
            time_nodes: Vec::with_capacity(len),
            sell_nodes: vec![None; len],
        };

        for index in 0..len {
            let node = graph.graph.add_node(Node::Time(index));
            graph.time_nodes.push(node);
        }

        for index in 1..len {
            graph.graph.add_edge(
                graph.time_nodes[index - 1],
                graph.time_nodes[index],
                EdgeData::wait(),
            );
        }

        graph
    }

    fn get_or_create_sell(&mut self, index: usize) -> NodeIndex {
        if let Some(node) = self.sell_nodes[index] {
            return node;
        }

        let node = self.graph.add_node(Node::Sell(index));
        self.sell_nodes[index] = Some(node);
        node
    }

    /// Add a profitable trade plus the release edge out of its sell node
    fn add_trade(&mut self, buy_index: usize, sell_index: usize, buy_value: f64, sell_value: f64) {
        let from = self.time_nodes[buy_index];
        let to = self.get_or_create_sell(sell_index);
        self.graph
            .add_edge(from, to, EdgeData::trade(buy_value, sell_value));

        if let Some(&next) = self.time_nodes.get(sell_index + 1) {
            // update_edge keeps a single release edge per sell node
            self.graph.update_edge(to, next, EdgeData::release());
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Number of minutes covered by the graph
    pub fn series_len(&self) -> usize {
        self.time_nodes.len()
    }

    pub fn node_index(&self, node: Node) -> Option<NodeIndex> {
        match node {
            Node::Time(index) => self.time_nodes.get(index).copied(),
            Node::Sell(index) => self.sell_nodes.get(index).copied().flatten(),
        }
    }

    pub fn node(&self, index: NodeIndex) -> Option<Node> {
        self.graph.node_weight(index).copied()
    }

    /// Edge payload between two nodes, if such an edge exists
    pub fn edge_between(&self, from: Node, to: Node) -> Option<&EdgeData> {
        let from = self.node_index(from)?;
        let to = self.node_index(to)?;
        let edge = self.graph.find_edge(from, to)?;
        self.graph.edge_weight(edge)
    }

    /// Outgoing edges of a node as `(target, payload)` pairs
    pub fn successors(&self, node: Node) -> impl Iterator<Item = (Node, &EdgeData)> + '_ {
        self.node_index(node).into_iter().flat_map(move |idx| {
            self.graph
                .edges(idx)
                .map(move |edge| (self.graph[edge.target()], edge.weight()))
        })
    }

    /// Nodes in increasing minute order, `Time(t)` before `Sell(t)`.
    ///
    /// Every edge points to a later minute, so this order is topological.
    pub fn time_order(&self) -> impl Iterator<Item = Node> + '_ {
        (0..self.series_len()).flat_map(move |index| {
            let sell = self.sell_nodes[index].map(|_| Node::Sell(index));
            std::iter::once(Node::Time(index)).chain(sell)
        })
    }

    /// All trade edges as `(buy node, sell node, payload)`
    pub fn trade_edges(&self) -> impl Iterator<Item = (Node, Node, &EdgeData)> + '_ {
        self.graph
            .edge_references()
            .filter(|edge| edge.weight().is_trade())
            .map(move |edge| {
                (
                    self.graph[edge.source()],
                    self.graph[edge.target()],
                    edge.weight(),
                )
            })
    }

    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            nodes: self.node_count(),
            edges: self.edge_count(),
            sell_nodes: self.sell_nodes.iter().filter(|n| n.is_some()).count(),
            ..GraphStats::default()
        };

        for edge in self.graph.edge_references() {
            match edge.weight().kind {
                EdgeKind::Trade { .. } => stats.trade_edges += 1,
                EdgeKind::Wait => stats.wait_edges += 1,
                EdgeKind::Release => stats.release_edges += 1,
            }
        }

        stats
    }
}

/// Builds a [`TradeGraph`] from a price series
pub struct GraphBuilder<'p> {
    window: HoldWindow,
    progress_interval: usize,
    progress: Option<&'p mut dyn BuildProgress>,
}

impl<'p> GraphBuilder<'p> {
    pub fn new(window: HoldWindow) -> Self {
        Self {
            window,
            progress_interval: 0,
            progress: None,
        }
    }

    /// Report progress every `interval` source minutes (0 disables)
    pub fn with_progress(mut self, interval: usize, observer: &'p mut dyn BuildProgress) -> Self {
        self.progress_interval = interval;
        self.progress = Some(observer);
        self
    }

    pub fn window(&self) -> HoldWindow {
        self.window
    }

    pub fn build(&mut self, series: &PriceSeries) -> TradeGraph {
        let len = series.len();

        if len < self.window.min_series_len() {
            debug!(
                "Series of {} samples is shorter than {} - no trade can complete",
                len,
                self.window.min_series_len()
            );
            return TradeGraph::new();
        }

        let prices: Vec<f64> = series.samples().iter().map(|s| s.price).collect();
        let mut graph = TradeGraph::with_wait_chain(len);

        // last minute at which a minimum hold still completes in range
        let sources = len - self.window.min;

        for buy_index in 0..sources {
            self.report(buy_index, sources);

            let buy_value = prices[buy_index];
            for duration in self.window.durations(buy_index, len) {
                let sell_index = buy_index + duration;
                let sell_value = prices[sell_index];

                if sell_value - buy_value > 0.0 {
                    trace!(
                        "trade edge {} -> {} ({:+})",
                        buy_index,
                        sell_index,
                        sell_value - buy_value
                    );
                    graph.add_trade(buy_index, sell_index, buy_value, sell_value);
                }
            }
        }
        self.report(sources, sources);

        let stats = graph.stats();
        info!(
            "Graph built: {} Nodes, {} Edges ({} trades, {} sell points)",
            stats.nodes, stats.edges, stats.trade_edges, stats.sell_nodes
        );

        graph
    }

    fn report(&mut self, processed: usize, total: usize) {
        if self.progress_interval == 0 {
            return;
        }
        if processed % self.progress_interval != 0 && processed != total {
            return;
        }
        if let Some(observer) = self.progress.as_mut() {
            observer.on_progress(processed, total);
        }
    }
}

impl Default for GraphBuilder<'_> {
    fn default() -> Self {
        Self::new(HoldWindow::default())
    }
}
