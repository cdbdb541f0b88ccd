//! Vertex in the assembled graph.

use serde::{Deserialize, Serialize};
use super::{PropertyMap, Value};

/// A unit together with its attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex<U> {
    pub label: U,
    pub properties: PropertyMap,
}

impl<U> Vertex<U> {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}
