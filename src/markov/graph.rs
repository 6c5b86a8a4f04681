use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::debug;

/// Page number. `EXIT_STATE` is reserved.
pub type Node = u32;

/// Terminal state every session transitions into after its last page.
pub const EXIT_STATE: Node = 0;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    /// The graph was mutated after (or never had) `compute_probabilities`.
    #[error("transition probabilities from node {node} are not computed")]
    ProbabilitiesNotComputed { node: Node },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Observed transition count, always positive.
    pub weight: u64,
    /// `weight / total outgoing weight of the source`, once computed.
    pub probability: Option<f64>,
}

/// Weighted directed graph of page transitions.
///
/// Repeated transitions fold into the edge weight, self-loops are allowed.
/// Mutating an edge clears the stored probabilities of its source node, so
/// a stale probability is never returned. Recomputing them is up to the
/// caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: BTreeSet<Node>,
    edges: BTreeMap<(Node, Node), Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `(from, to)` pairs into a graph, one unit of weight per pair.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Node, Node)>,
    {
        let mut g = Self::new();
        for (u, v) in pairs {
            g.add_edge(u, v);
        }
        g
    }

    pub fn add_edge(&mut self, u: Node, v: Node) {
        self.add_weight(u, v, 1);
    }

    /// Add `weight` observations of `u -> v`. A zero weight is a no-op so
    /// that every stored edge keeps a positive weight.
    pub fn add_weight(&mut self, u: Node, v: Node, weight: u64) {
        if weight == 0 {
            return;
        }

        self.nodes.insert(u);
        self.nodes.insert(v);
        self.edges
            .entry((u, v))
            .or_insert(Edge {
                weight: 0,
                probability: None,
            })
            .weight += weight;

        self.invalidate(u);
    }

    /// Add every edge of `source` to this graph, summing weights.
    pub fn merge_from(&mut self, source: &Graph) {
        self.nodes.extend(source.nodes.iter().copied());
        for (&(u, v), edge) in &source.edges {
            self.add_weight(u, v, edge.weight);
        }
    }

    fn invalidate(&mut self, u: Node) {
        for (_, edge) in self.edges.range_mut((u, Node::MIN)..=(u, Node::MAX)) {
            edge.probability = None;
        }
    }

    /// Populate every edge with its maximum-likelihood transition
    /// probability. Nodes without outgoing edges have no total and are
    /// never divided by.
    pub fn compute_probabilities(&mut self) {
        let mut totals: BTreeMap<Node, u64> = BTreeMap::new();
        for (&(u, _), edge) in &self.edges {
            *totals.entry(u).or_default() += edge.weight;
        }

        for (&(u, _), edge) in self.edges.iter_mut() {
            if let Some(&total) = totals.get(&u) {
                edge.probability = Some(edge.weight as f64 / total as f64);
            }
        }

        debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "computed transition probabilities"
        );
    }

    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.nodes.iter().copied()
    }

    /// Edges as `(from, to, edge)`, ordered by `(from, to)`.
    pub fn edges(&self) -> impl Iterator<Item = (Node, Node, &Edge)> + '_ {
        self.edges.iter().map(|(&(u, v), e)| (u, v, e))
    }

    pub fn out_edges(&self, u: Node) -> impl Iterator<Item = (Node, &Edge)> + '_ {
        self.edges
            .range((u, Node::MIN)..=(u, Node::MAX))
            .map(|(&(_, v), e)| (v, e))
    }

    pub fn edge(&self, u: Node, v: Node) -> Option<&Edge> {
        self.edges.get(&(u, v))
    }

    pub fn weight(&self, u: Node, v: Node) -> Option<u64> {
        self.edge(u, v).map(|e| e.weight)
    }

    /// `None` when the edge is absent or its probability is not computed.
    pub fn probability(&self, u: Node, v: Node) -> Option<f64> {
        self.edge(u, v).and_then(|e| e.probability)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Dimension of the square matrix needed for this graph.
    pub fn size(&self) -> usize {
        self.nodes.last().map_or(0, |&n| n as usize + 1)
    }

    /// Markov matrix view of the graph. Fails if any probability is
    /// missing.
    pub fn transition_matrix(&self) -> Result<TransitionMatrix, GraphError> {
        let mut rows: BTreeMap<Node, BTreeMap<Node, f64>> = BTreeMap::new();
        for (&(u, v), edge) in &self.edges {
            let p = edge
                .probability
                .ok_or(GraphError::ProbabilitiesNotComputed { node: u })?;
            rows.entry(u).or_default().insert(v, p);
        }

        Ok(TransitionMatrix {
            size: self.size(),
            rows,
        })
    }
}

/// Sparse square matrix of one-step transition probabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    size: usize,
    rows: BTreeMap<Node, BTreeMap<Node, f64>>,
}

impl TransitionMatrix {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, u: Node, v: Node) -> f64 {
        self.rows
            .get(&u)
            .and_then(|row| row.get(&v))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn row_sum(&self, u: Node) -> f64 {
        self.rows.get(&u).map_or(0.0, |row| row.values().sum())
    }
}

/// Sum any number of graphs into one. The result has no probabilities.
pub fn aggregate<'a, I>(graphs: I) -> Graph
where
    I: IntoIterator<Item = &'a Graph>,
{
    let mut combined = Graph::new();
    let mut merged = 0usize;
    for g in graphs {
        combined.merge_from(g);
        merged += 1;
    }
    debug!(graphs = merged, edges = combined.edge_count(), "aggregated graphs");
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edge_folds_repeats_into_weight() {
        let mut g = Graph::new();
        g.add_edge(1, 2);
        g.add_edge(1, 2);
        g.add_edge(2, 2);

        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.weight(1, 2), Some(2));
        assert_eq!(g.weight(2, 2), Some(1));
        assert_eq!(g.nodes().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn zero_weight_is_ignored() {
        let mut g = Graph::new();
        g.add_weight(4, 5, 0);
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn probabilities_use_weight_totals() {
        let mut g = Graph::from_pairs([(1, 2), (1, 2), (1, 2), (1, 0)]);
        g.compute_probabilities();

        assert_eq!(g.probability(1, 2), Some(0.75));
        assert_eq!(g.probability(1, 0), Some(0.25));
        assert_eq!(g.probability(2, 1), None);
    }

    #[test]
    fn mutation_clears_only_the_source_row() {
        let mut g = Graph::from_pairs([(1, 2), (2, 0)]);
        g.compute_probabilities();

        g.add_edge(1, 3);
        assert_eq!(g.probability(1, 2), None);
        assert_eq!(g.probability(1, 3), None);
        assert_eq!(g.probability(2, 0), Some(1.0));
        assert_eq!(
            g.transition_matrix(),
            Err(GraphError::ProbabilitiesNotComputed { node: 1 })
        );

        g.compute_probabilities();
        assert_eq!(g.probability(1, 2), Some(0.5));
    }

    #[test]
    fn size_is_largest_node_plus_one() {
        assert_eq!(Graph::new().size(), 0);
        let g = Graph::from_pairs([(7, 0), (2, 7)]);
        assert_eq!(g.size(), 8);
    }

    #[test]
    fn matrix_defaults_to_zero() {
        let mut g = Graph::from_pairs([(1, 3), (3, 0)]);
        g.compute_probabilities();
        let m = g.transition_matrix().unwrap();

        assert_eq!(m.size(), 4);
        assert_eq!(m.get(1, 3), 1.0);
        assert_eq!(m.get(2, 3), 0.0);
        assert_eq!(m.row_sum(2), 0.0);
        assert_eq!(m.row_sum(3), 1.0);
    }

    #[test]
    fn merge_into_empty_is_identity() {
        let source = Graph::from_pairs([(1, 3), (3, 3), (3, 0)]);
        let mut target = Graph::new();
        target.merge_from(&source);
        assert_eq!(target, source);
    }

    #[test]
    fn aggregate_sums_weights() {
        let a = Graph::from_pairs([(1, 2), (2, 0)]);
        let b = Graph::from_pairs([(1, 2), (2, 1), (1, 0)]);
        let g = aggregate([&a, &b]);

        assert_eq!(g.weight(1, 2), Some(2));
        assert_eq!(g.weight(2, 0), Some(1));
        assert_eq!(g.weight(2, 1), Some(1));
        assert_eq!(g.weight(1, 0), Some(1));
        assert_eq!(g.probability(1, 2), None);
    }
}
