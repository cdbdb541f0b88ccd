//! # Matrix Layer
//!
//! Sparse incidence matrices with first-occurrence labels, row rollup, and
//! the dense adjacency type produced at the end of a pipeline.
//!
//! ```text
//! events ──► SparseMatrix (unit × context) ──► aggregate()* ──► similarity / ties
//!                                                                  │
//!                                                         AdjacencyMatrix (unit × unit)
//! ```

pub mod labels;
pub mod sparse;
pub mod aggregate;
pub mod adjacency;

pub use labels::LabelIndex;
pub use sparse::SparseMatrix;
pub use aggregate::{aggregate, Reduction, Rollup};
pub use adjacency::AdjacencyMatrix;
