//! Per-unit participation counts attached to every vertex.

use std::hash::Hash;

use hashbrown::HashSet;

use crate::assemble::VertexTable;
use crate::matrix::LabelIndex;
use crate::model::{Event, Value};

/// Vertex attribute: number of distinct contexts the unit acted in.
pub const CONTEXTS: &str = "contexts";
/// Vertex attribute: number of raw events by the unit.
pub const EVENTS: &str = "events";
/// Vertex attribute: summed event values of the unit.
pub const VOLUME: &str = "volume";

/// Participation of every unit, in first-occurrence order.
#[derive(Debug, Clone)]
pub struct Participation<U> {
    units: LabelIndex<U>,
    contexts: Vec<usize>,
    events: Vec<usize>,
    volume: Vec<f64>,
}

impl<U: Hash + Eq + Clone> Participation<U> {
    /// Count events per unit. Events without a context still count as
    /// events but not toward `contexts`.
    pub fn from_events<C: Hash + Eq>(events: &[Event<U, C>]) -> Self {
        let mut units = LabelIndex::new();
        let mut counts: Vec<usize> = Vec::new();
        let mut volume: Vec<f64> = Vec::new();
        let mut seen: HashSet<(usize, &C)> = HashSet::new();
        let mut contexts: Vec<usize> = Vec::new();

        for e in events {
            let u = units.intern(e.unit.clone());
            if u == counts.len() {
                counts.push(0);
                volume.push(0.0);
                contexts.push(0);
            }
            counts[u] += 1;
            volume[u] += e.value;
            if let Some(ctx) = &e.context {
                if seen.insert((u, ctx)) {
                    contexts[u] += 1;
                }
            }
        }

        Self { units, contexts, events: counts, volume }
    }

    pub fn contexts(&self, unit: &U) -> usize {
        self.units.get(unit).map_or(0, |u| self.contexts[u])
    }

    pub fn events(&self, unit: &U) -> usize {
        self.units.get(unit).map_or(0, |u| self.events[u])
    }

    pub fn volume(&self, unit: &U) -> f64 {
        self.units.get(unit).map_or(0.0, |u| self.volume[u])
    }

    /// Vertex attributes `contexts`, `events` and `volume` for every unit.
    pub fn to_table(&self) -> VertexTable<U> {
        let mut table = VertexTable::new();
        for (u, unit) in self.units.labels().iter().enumerate() {
            table.insert(unit.clone(), CONTEXTS, Value::from(self.contexts[u]));
            table.insert(unit.clone(), EVENTS, Value::from(self.events[u]));
            table.insert(unit.clone(), VOLUME, Value::from(self.volume[u]));
        }
        table
    }
}

impl<U> Participation<U> {
    pub fn units(&self) -> &[U] {
        self.units.labels()
    }
}
