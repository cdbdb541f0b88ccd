//! # tiegraph: Social-Network Graphs from Communication Events
//!
//! Turns raw event records (who acted, in which context, at which position)
//! into weighted relational graphs.
//!
//! ## Design Principles
//!
//! 1. **Sparse until the end**: events become a labeled `SparseMatrix`; the
//!    only dense structure is the final unit × unit `AdjacencyMatrix`
//! 2. **Pure functions**: every stage maps immutable input to a new value
//! 3. **Closed dispatch**: measures and directions are enums, not strings
//! 4. **Total numerics**: zero denominators resolve to 0, never NaN
//!
//! ## Quick Start
//!
//! ```rust
//! use tiegraph::{Event, SimilarityConfig, Measure, VertexTable};
//!
//! # fn example() -> tiegraph::Result<()> {
//! let events = vec![
//!     Event::in_context("ann", "thread-1"),
//!     Event::in_context("bob", "thread-1"),
//!     Event::in_context("ann", "thread-2").with_value(3.0),
//! ];
//!
//! let config = SimilarityConfig::default().with_measure(Measure::CoincidenceCount);
//! let graph = tiegraph::similarity_network(&events, &config, &VertexTable::new())?;
//!
//! assert_eq!(graph.weight(&"ann", &"bob"), 1.0);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Construction Paths
//!
//! | Path | Entry point | Ties from |
//! |------|-------------|-----------|
//! | Similarity | `similarity_network` | shared contexts / features |
//! | Windowed | `windowed_graph` | positions `1..=W` back in a context |
//! | First author | `first_author_graph` | the opener of each context |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod matrix;
pub mod similarity;
pub mod window;
pub mod assemble;
pub mod participation;
pub mod config;

use std::hash::Hash;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Event, Value, PropertyMap, Vertex, Edge, Graph, Direction,
    events_from_columns,
};

// ============================================================================
// Re-exports: Engines
// ============================================================================

pub use matrix::{SparseMatrix, AdjacencyMatrix, Reduction, Rollup, aggregate};
pub use similarity::{Measure, similarity_matrix, similarity_graph};
pub use window::{
    TargetRule, tie_matrix, first_author_matrix, windowed_graph, first_author_graph,
    dedupe_by_context_then_aggregate,
};
pub use assemble::{VertexTable, assemble, assemble_with};
pub use participation::Participation;

// ============================================================================
// Re-exports: Configuration
// ============================================================================

pub use config::{SimilarityConfig, WindowConfig};

// ============================================================================
// Pipelines
// ============================================================================

/// Similarity graph of units compared by their value-weighted context
/// vectors.
///
/// Vertices carry participation counts merged with `groups`. Every event
/// must have a context.
pub fn similarity_network<U, C>(
    events: &[Event<U, C>],
    config: &SimilarityConfig,
    groups: &VertexTable<U>,
) -> Result<Graph<U>>
where
    U: Hash + Eq + Clone,
    C: Hash + Eq + Clone,
{
    let incidence = SparseMatrix::from_events(events)?;
    let vertices = Participation::from_events(events).to_table().merged(groups);
    similarity_graph(&incidence, config, &vertices)
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid input `{argument}`: {message}")]
    InvalidInput { argument: &'static str, message: String },

    #[error("Length mismatch: `{argument}` has {got} entries, expected {expected}")]
    LengthMismatch { argument: &'static str, expected: usize, got: usize },

    #[error("Unknown {kind}: `{name}`")]
    UnknownName { kind: &'static str, name: String },

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// True for every error caused by arguments violating their contract.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput { .. }
                | Error::LengthMismatch { .. }
                | Error::UnknownName { .. }
                | Error::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
