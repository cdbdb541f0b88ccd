//! Graph: the vertex and edge lists handed to external consumers.

use serde::{Deserialize, Serialize};
use super::{Edge, Vertex};

/// An assembled weighted graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph<U> {
    /// One vertex per unit, in first-occurrence order.
    pub vertices: Vec<Vertex<U>>,
    /// Ties with non-zero weight. Self-ties are never present.
    pub edges: Vec<Edge<U>>,
    pub directed: bool,
}

impl<U: PartialEq> Graph<U> {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex(&self, label: &U) -> Option<&Vertex<U>> {
        self.vertices.iter().find(|v| v.label == *label)
    }

    /// The edge from `src` to `dst`; for undirected graphs either orientation.
    pub fn edge(&self, src: &U, dst: &U) -> Option<&Edge<U>> {
        self.edges.iter().find(|e| e.connects(src, dst))
    }

    /// Weight of the tie `src → dst`, 0 when absent.
    pub fn weight(&self, src: &U, dst: &U) -> f64 {
        self.edge(src, dst).map_or(0.0, |e| e.weight)
    }
}
