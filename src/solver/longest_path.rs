//! Longest Path over the Trade DAG
//!
//! Step 2.1: The Pathfinder
//!
//! Every edge moves to a later minute, and at any minute the time node is
//! settled before the sell node. Walking minutes in order is therefore a
//! topological order already, so one relaxation pass gives the heaviest
//! path from the first minute.

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use tracing::{debug, info};

use crate::graph::{Node, TradeGraph};

/// An ordered walk through the trade graph
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub nodes: Vec<Node>,
    /// Sum of traversed edge weights, i.e. total profit
    pub total_weight: f64,
}

impl Path {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn start(&self) -> Option<Node> {
        self.nodes.first().copied()
    }

    pub fn end(&self) -> Option<Node> {
        self.nodes.last().copied()
    }

    /// Consecutive `(from, to)` steps along the path
    pub fn steps(&self) -> impl Iterator<Item = (Node, Node)> + '_ {
        self.nodes.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

/// Best-known weight and predecessor for every node after one DP pass
#[derive(Debug, Clone)]
pub struct Relaxation<'a> {
    graph: &'a TradeGraph,
    best: Vec<f64>,
    pred: Vec<Option<NodeIndex>>,
}

impl Relaxation<'_> {
    /// Heaviest weight from the start to `node`, `None` if unreachable
    pub fn best(&self, node: Node) -> Option<f64> {
        let idx = self.graph.node_index(node)?;
        let best = self.best[idx.index()];
        (best != f64::NEG_INFINITY).then_some(best)
    }

    /// Node the heaviest path to `node` arrives from
    pub fn predecessor(&self, node: Node) -> Option<Node> {
        let idx = self.graph.node_index(node)?;
        self.pred[idx.index()].and_then(|p| self.graph.node(p))
    }
}

/// Linear-time longest path solver for trade graphs
pub struct LongestPathSolver<'a> {
    graph: &'a TradeGraph,
}

impl<'a> LongestPathSolver<'a> {
    pub fn new(graph: &'a TradeGraph) -> Self {
        Self { graph }
    }

    /// Run the DP pass from `Time(0)` in minute order.
    ///
    /// Equal candidates keep the first relaxation seen.
    pub fn relax(&self) -> Relaxation<'a> {
        let graph = self.graph;
        let count = graph.node_count();
        let mut best = vec![f64::NEG_INFINITY; count];
        let mut pred: Vec<Option<NodeIndex>> = vec![None; count];

        if let Some(start) = graph.node_index(Node::Time(0)) {
            best[start.index()] = 0.0;
        }

        for node in graph.time_order() {
            let Some(source) = graph.node_index(node) else {
                continue;
            };
            let base = best[source.index()];
            if base == f64::NEG_INFINITY {
                continue;
            }

            for edge in graph.graph.edges(source) {
                let target = edge.target().index();
                let candidate = base + edge.weight().weight;
                if candidate > best[target] {
                    best[target] = candidate;
                    pred[target] = Some(source);
                }
            }
        }

        Relaxation { graph, best, pred }
    }

    /// Heaviest path through the graph, `None` for an empty graph
    pub fn solve(&self) -> Option<Path> {
        if self.graph.is_empty() {
            debug!("Solver invoked on an empty graph");
            return None;
        }

        let relaxation = self.relax();
        let last = self.graph.series_len().checked_sub(1)?;

        let mut end = Node::Time(last);
        let mut end_weight = relaxation.best(end)?;
        if let Some(weight) = relaxation.best(Node::Sell(last)) {
            if weight > end_weight {
                end = Node::Sell(last);
                end_weight = weight;
            }
        }

        let mut nodes = vec![end];
        let mut current = end;
        while let Some(previous) = relaxation.predecessor(current) {
            nodes.push(previous);
            current = previous;
        }
        nodes.reverse();

        info!(
            "Longest path: {} nodes, total weight {:.4}",
            nodes.len(),
            end_weight
        );

        Some(Path {
            nodes,
            total_weight: end_weight,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeKind, GraphBuilder};
    use crate::series::PriceSeries;

    fn solve(prices: Vec<f64>) -> (TradeGraph, Option<Path>) {
        let graph = GraphBuilder::default().build(&PriceSeries::from_prices(prices));
        let path = LongestPathSolver::new(&graph).solve();
        (graph, path)
    }

    fn zigzag(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| 50.0 + ((i * 29) % 17) as f64 - ((i / 40) % 3) as f64 * 4.0)
            .collect()
    }

    #[test]
    fn test_empty_graph_has_no_path() {
        let (graph, path) = solve(vec![1.0; 30]);
        assert!(graph.is_empty());
        assert!(path.is_none());
    }

    #[test]
    fn test_constant_prices_wait_all_the_way() {
        let (_, path) = solve(vec![7.0; 65]);
        let path = path.unwrap();

        assert_eq!(path.total_weight, 0.0);
        assert_eq!(path.len(), 65);
        assert!(path.nodes.iter().enumerate().all(|(i, n)| *n == Node::Time(i)));
    }

    #[test]
    fn test_path_starts_at_first_minute_and_follows_edges() {
        let (graph, path) = solve(zigzag(300));
        let path = path.unwrap();

        assert_eq!(path.start(), Some(Node::Time(0)));
        assert_eq!(path.end().map(|n| n.index()), Some(299));

        let mut sum = 0.0;
        for (from, to) in path.steps() {
            let edge = graph
                .edge_between(from, to)
                .unwrap_or_else(|| panic!("missing edge {} -> {}", from, to));
            sum += edge.weight;
        }
        assert_eq!(sum, path.total_weight);
    }

    #[test]
    fn test_predecessors_precede_in_time() {
        let (graph, _) = solve(zigzag(250));
        let relaxation = LongestPathSolver::new(&graph).relax();

        assert_eq!(relaxation.best(Node::Time(0)), Some(0.0));
        assert_eq!(relaxation.predecessor(Node::Time(0)), None);

        for node in graph.time_order().skip(1) {
            let pred = relaxation.predecessor(node).unwrap();
            assert!(pred.index() < node.index());
            assert!(graph.edge_between(pred, node).is_some());

            let via = relaxation.best(pred).unwrap() + graph.edge_between(pred, node).unwrap().weight;
            assert_eq!(relaxation.best(node), Some(via));
        }
    }

    #[test]
    fn test_single_rise_is_taken() {
        let mut prices = vec![10.0; 40];
        prices[35] = 14.0;
        let (graph, path) = solve(prices);
        let path = path.unwrap();

        assert_eq!(path.total_weight, 4.0);
        let trades: Vec<_> = path
            .steps()
            .filter(|(from, to)| {
                matches!(graph.edge_between(*from, *to).map(|e| e.kind), Some(EdgeKind::Trade { .. }))
            })
            .collect();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].1, Node::Sell(35));
        assert!(trades[0].0.index() <= 5);
    }

    #[test]
    fn test_trade_closing_on_last_minute_ends_path() {
        let mut prices = vec![10.0; 31];
        prices[30] = 11.0;
        let (_, path) = solve(prices);
        let path = path.unwrap();

        assert_eq!(path.nodes, vec![Node::Time(0), Node::Sell(30)]);
        assert_eq!(path.total_weight, 1.0);
    }

    #[test]
    fn test_infinite_weight_is_reachable() {
        let mut prices = vec![10.0; 40];
        prices[35] = f64::INFINITY;
        let (graph, path) = solve(prices);
        let relaxation = LongestPathSolver::new(&graph).relax();

        assert_eq!(relaxation.best(Node::Sell(35)), Some(f64::INFINITY));
        let path = path.unwrap();
        assert_eq!(path.end(), Some(Node::Time(39)));
        assert_eq!(path.total_weight, f64::INFINITY);
    }

    #[test]
    fn test_solve_is_deterministic() {
        let (graph, first) = solve(zigzag(400));
        let second = LongestPathSolver::new(&graph).solve();
        assert_eq!(first, second);
    }

    #[test]
    fn test_concurrent_solves_share_graph() {
        let (graph, expected) = solve(zigzag(500));

        let results: Vec<Option<Path>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| LongestPathSolver::new(&graph).solve()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for result in results {
            assert_eq!(result, expected);
        }
    }
}
