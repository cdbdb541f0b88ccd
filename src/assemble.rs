//! Graph assembly: turn a labeled adjacency matrix into vertex and edge lists.
//!
//! This is the only surface external consumers (layout, rendering, export)
//! see. It is a pure transformation:
//!
//! ```text
//! AdjacencyMatrix + VertexTable ──► assemble() ──► Graph { vertices, edges }
//! ```
//!
//! - one vertex per matrix label, carrying the table's attributes
//! - one edge per non-zero off-diagonal cell at or above the threshold
//! - undirected matrices only emit the `i < j` half

use std::hash::Hash;

use hashbrown::HashMap;

use crate::matrix::AdjacencyMatrix;
use crate::model::{Edge, Graph, PropertyMap, Value, Vertex};

/// Per-unit vertex attributes, keyed by unit.
#[derive(Debug, Clone)]
pub struct VertexTable<U> {
    rows: HashMap<U, PropertyMap>,
}

impl<U> Default for VertexTable<U> {
    fn default() -> Self {
        Self { rows: HashMap::new() }
    }
}

impl<U: Hash + Eq> VertexTable<U> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grouping-variable values from `(unit, key, value)` rows. A unit
    /// listed twice for the same key keeps the last value.
    pub fn with_groups<K, V>(rows: impl IntoIterator<Item = (U, K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut table = Self::new();
        for (unit, key, value) in rows {
            table.insert(unit, key, value);
        }
        table
    }

    pub fn insert(&mut self, unit: U, key: impl Into<String>, value: impl Into<Value>) {
        self.rows.entry(unit).or_default().insert(key.into(), value.into());
    }

    pub fn get(&self, unit: &U) -> Option<&PropertyMap> {
        self.rows.get(unit)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<U: Hash + Eq + Clone> VertexTable<U> {
    /// `self` overlaid with `other`; `other` wins on conflicting keys.
    pub fn merged(&self, other: &VertexTable<U>) -> Self {
        let mut rows = self.rows.clone();
        for (unit, props) in &other.rows {
            let target = rows.entry(unit.clone()).or_default();
            for (k, v) in props {
                target.insert(k.clone(), v.clone());
            }
        }
        Self { rows }
    }
}

/// Assemble a graph with plain `weight` edges.
pub fn assemble<U>(
    adjacency: &AdjacencyMatrix<U>,
    vertices: &VertexTable<U>,
    min_weight: Option<f64>,
) -> Graph<U>
where
    U: Hash + Eq + Clone,
{
    assemble_with(adjacency, vertices, min_weight, |_, _, _| PropertyMap::new())
}

/// Assemble a graph, asking `edge_properties(src, dst, weight)` for the
/// extra attributes of every emitted edge.
pub fn assemble_with<U, F>(
    adjacency: &AdjacencyMatrix<U>,
    vertices: &VertexTable<U>,
    min_weight: Option<f64>,
    edge_properties: F,
) -> Graph<U>
where
    U: Hash + Eq + Clone,
    F: Fn(&U, &U, f64) -> PropertyMap,
{
    let directed = adjacency.is_directed();
    let labels = adjacency.labels();

    let vertex_list: Vec<Vertex<U>> = labels
        .iter()
        .map(|label| Vertex {
            label: label.clone(),
            properties: vertices.get(label).cloned().unwrap_or_default(),
        })
        .collect();

    let mut edges = Vec::new();
    for (i, src) in labels.iter().enumerate() {
        for (j, dst) in labels.iter().enumerate() {
            // Self-ties never become edges
            if i == j || (!directed && j < i) {
                continue;
            }
            let weight = adjacency.get(i, j);
            if weight == 0.0 || min_weight.is_some_and(|t| weight < t) {
                continue;
            }
            let mut edge = Edge::new(src.clone(), dst.clone(), weight, directed);
            edge.properties = edge_properties(src, dst, weight);
            edges.push(edge);
        }
    }

    if vertex_list.is_empty() {
        tracing::warn!("assembled an empty graph: no units in input");
    } else if edges.is_empty() {
        tracing::warn!(vertices = vertex_list.len(), "assembled a graph without edges");
    } else {
        tracing::debug!(vertices = vertex_list.len(), edges = edges.len(), directed, "assembled graph");
    }

    Graph { vertices: vertex_list, edges, directed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::properties;

    fn directed_sample() -> AdjacencyMatrix<&'static str> {
        let mut m = AdjacencyMatrix::zeros(vec!["a", "b", "c"], true);
        m.add(0, 1, 2.0);
        m.add(1, 0, 0.5);
        m.add(2, 2, 9.0);
        m
    }

    #[test]
    fn test_vertices_carry_table_attributes() {
        let table = VertexTable::with_groups([("a", "team", "red"), ("c", "team", "blue")]);
        let g = assemble(&directed_sample(), &table, None);
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.vertex(&"a").unwrap().get("team"), Some(&Value::from("red")));
        assert!(g.vertex(&"b").unwrap().properties.is_empty());
    }

    #[test]
    fn test_diagonal_and_zero_cells_are_skipped() {
        let g = assemble(&directed_sample(), &VertexTable::new(), None);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.weight(&"a", &"b"), 2.0);
        assert_eq!(g.weight(&"b", &"a"), 0.5);
        assert!(g.edge(&"c", &"c").is_none());
    }

    #[test]
    fn test_threshold() {
        let g = assemble(&directed_sample(), &VertexTable::new(), Some(1.0));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_undirected_emits_upper_half() {
        let sym = directed_sample().symmetrized();
        let g = assemble(&sym, &VertexTable::new(), None);
        assert_eq!(g.edge_count(), 1);
        let e = &g.edges[0];
        assert_eq!((e.src, e.dst, e.weight, e.directed), ("a", "b", 2.5, false));
    }

    #[test]
    fn test_edge_property_callback() {
        let g = assemble_with(&directed_sample(), &VertexTable::new(), None, |src, _, w| {
            properties([("label", Value::from(format!("{src}:{w}")))])
        });
        assert_eq!(g.edge(&"a", &"b").unwrap().get("label"), Some(&Value::from("a:2")));
    }

    #[test]
    fn test_merged_tables() {
        let base = VertexTable::with_groups([("a", "events", 1), ("a", "team", 0)]);
        let overlay = VertexTable::with_groups([("a", "team", 7), ("b", "team", 8)]);
        let merged = base.merged(&overlay);
        let a = merged.get(&"a").unwrap();
        assert_eq!(a["events"], Value::Int(1));
        assert_eq!(a["team"], Value::Int(7));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_empty() {
        let g = assemble(&AdjacencyMatrix::<u32>::zeros(vec![], false), &VertexTable::new(), None);
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
    }
}
