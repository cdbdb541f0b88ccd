//! Edge (tie) in the assembled graph.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use super::{PropertyMap, Value};
use crate::Error;

/// Orientation of windowed ties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// `w[i,j] + w[j,i]` for every pair.
    #[serde(rename = "undirected")]
    Undirected,
    /// Edge from the later author to the earlier one.
    #[default]
    #[serde(rename = "directed.up")]
    DirectedUp,
    /// Edge from the earlier author to the later one.
    #[serde(rename = "directed.down")]
    DirectedDown,
}

impl Direction {
    pub fn name(self) -> &'static str {
        match self {
            Direction::Undirected => "undirected",
            Direction::DirectedUp => "directed.up",
            Direction::DirectedDown => "directed.down",
        }
    }

    pub fn is_directed(self) -> bool {
        !matches!(self, Direction::Undirected)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "undirected" => Ok(Direction::Undirected),
            "directed.up" => Ok(Direction::DirectedUp),
            "directed.down" => Ok(Direction::DirectedDown),
            other => Err(Error::UnknownName { kind: "direction", name: other.to_string() }),
        }
    }
}

/// A weighted tie between two units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<U> {
    pub src: U,
    pub dst: U,
    pub weight: f64,
    pub directed: bool,
    pub properties: PropertyMap,
}

impl<U: PartialEq> Edge<U> {
    pub fn new(src: U, dst: U, weight: f64, directed: bool) -> Self {
        Self { src, dst, weight, directed, properties: PropertyMap::new() }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// True if this edge connects `a` to `b`, in either orientation when
    /// undirected.
    pub fn connects(&self, a: &U, b: &U) -> bool {
        (self.src == *a && self.dst == *b) || (!self.directed && self.src == *b && self.dst == *a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_names_round_trip() {
        for d in [Direction::Undirected, Direction::DirectedUp, Direction::DirectedDown] {
            assert_eq!(d.name().parse::<Direction>().unwrap(), d);
        }
        assert_eq!(Direction::default(), Direction::DirectedUp);
    }

    #[test]
    fn test_unknown_direction() {
        let err = "sideways".parse::<Direction>().unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("sideways"));
    }

    #[test]
    fn test_connects() {
        let undirected = Edge::new("a", "b", 1.0, false);
        assert!(undirected.connects(&"b", &"a"));
        let directed = Edge::new("a", "b", 1.0, true);
        assert!(directed.connects(&"a", &"b"));
        assert!(!directed.connects(&"b", &"a"));
    }
}
