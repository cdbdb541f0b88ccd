//! # Network Model
//!
//! Plain DTOs that cross every boundary: events in, graphs out.
//!
//! Design rule: no matrix types here. This module is pure data: no
//! algorithms, no state.

pub mod event;
pub mod value;
pub mod property_map;
pub mod vertex;
pub mod edge;
pub mod graph;

pub use event::{Event, events_from_columns};
pub use value::Value;
pub use property_map::{PropertyMap, properties};
pub use vertex::Vertex;
pub use edge::{Edge, Direction};
pub use graph::Graph;
