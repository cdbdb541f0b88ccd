//! # Windowed Tie Engine
//!
//! Ties from temporal proximity inside a context. An event at position `o`
//! ties its author to the authors at positions `o − 1 ..= o − W` of the same
//! context (or, in first-author mode, to the author(s) at the first position).
//!
//! ```text
//! events ──► event_ties()            rows = event, cols = target unit, 0/1
//!               │
//!               ├─ count_once ──► dedupe_by_context_then_aggregate()
//!               │                   (context, source) ─sum─► clamp ─sum─► source
//!               └─ otherwise  ──► aggregate_by_source()
//!               │
//!          AdjacencyMatrix (source × target) ──► direction ──► assemble_with()
//! ```
//!
//! Weight `w[i,j]` in the un-oriented matrix means "i acted within W
//! positions after j". Each event contributes at most one tie per target,
//! however many lags matched.

use std::hash::Hash;

use smallvec::SmallVec;

use crate::assemble::{assemble_with, VertexTable};
use crate::config::WindowConfig;
use crate::matrix::{aggregate, AdjacencyMatrix, LabelIndex, Reduction, Rollup, SparseMatrix};
use crate::model::{properties, Direction, Event, Graph};
use crate::participation::Participation;
use crate::Result;

/// Edge attribute: weight divided by the source unit's event count.
///
/// Undirected edges are emitted once, with `src` the pair's member that
/// appears first in the input, so there `average` is relative to that unit.
pub const AVERAGE: &str = "average";

/// How the target events of an event are selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRule {
    /// Events `1..=window` positions earlier in the same context.
    Lookback { window: usize },
    /// The event(s) at the smallest position of the context.
    FirstAuthor,
}

/// Event × target-unit tie matrix, binarized per event.
///
/// Row labels are event positions in `events`; events without any tie have
/// no row. Every event needs a context and an order.
pub fn event_ties<U, C>(events: &[Event<U, C>], rule: TargetRule) -> Result<SparseMatrix<usize, U>>
where
    U: Hash + Eq + Clone,
    C: Hash + Eq + Clone,
{
    let mut contexts = LabelIndex::new();
    // Per context: (order, event position), sorted by order once all are in
    let mut timelines: Vec<Vec<(i64, usize)>> = Vec::new();
    let mut keyed = Vec::with_capacity(events.len());

    for (pos, e) in events.iter().enumerate() {
        let ctx = contexts.intern(e.require_context(pos)?.clone());
        let order = e.require_order(pos)?;
        if ctx == timelines.len() {
            timelines.push(Vec::new());
        }
        timelines[ctx].push((order, pos));
        keyed.push((ctx, order));
    }
    for timeline in &mut timelines {
        timeline.sort_unstable();
    }

    let mut triples = Vec::new();
    for (pos, &(ctx, order)) in keyed.iter().enumerate() {
        let timeline = &timelines[ctx];
        let earlier = &timeline[..timeline.partition_point(|&(o, _)| o < order)];
        let mut targets: SmallVec<[usize; 4]> = SmallVec::new();
        match rule {
            TargetRule::Lookback { window } => {
                let window = i64::try_from(window).unwrap_or(i64::MAX);
                targets.extend(
                    earlier
                        .iter()
                        .rev()
                        .take_while(|&&(o, _)| order.saturating_sub(o) <= window)
                        .map(|&(_, t)| t),
                );
            }
            TargetRule::FirstAuthor => {
                if let Some(&(first, _)) = earlier.first() {
                    targets.extend(earlier.iter().take_while(|&&(o, _)| o == first).map(|&(_, t)| t));
                }
            }
        }
        for t in targets {
            triples.push((pos, events[t].unit.clone(), 1.0));
        }
    }

    let ties = SparseMatrix::from_triples(triples).binarize();
    tracing::debug!(
        events = events.len(),
        contexts = contexts.len(),
        tie_events = ties.n_rows(),
        ties = ties.nnz(),
        ?rule,
        "collected event ties"
    );
    Ok(ties)
}

/// Count-once collapse: each target is counted at most once per
/// (context, source), then summed over contexts.
///
/// Rolls the event rows up by `(context, source)`, clamps the result to
/// presence and rolls up again by source alone.
pub fn dedupe_by_context_then_aggregate<U, C>(
    ties: &SparseMatrix<usize, U>,
    events: &[Event<U, C>],
) -> Result<Rollup<U, U>>
where
    U: Hash + Eq + Clone,
    C: Hash + Eq + Clone,
{
    let mut keys = Vec::with_capacity(ties.n_rows());
    for &pos in ties.row_labels() {
        let e = &events[pos];
        keys.push((e.require_context(pos)?.clone(), e.unit.clone()));
    }
    let per_context = aggregate(ties, &keys, Reduction::Sum)?;
    let clamped = per_context.matrix.binarize();

    let sources: Vec<U> = clamped.row_labels().iter().map(|(_, unit)| unit.clone()).collect();
    aggregate(&clamped, &sources, Reduction::Sum)
}

/// Plain collapse: every event-to-target tie counts.
pub fn aggregate_by_source<U, C>(
    ties: &SparseMatrix<usize, U>,
    events: &[Event<U, C>],
) -> Result<Rollup<U, U>>
where
    U: Hash + Eq + Clone,
    C: Hash + Eq + Clone,
{
    let sources: Vec<U> = ties.row_labels().iter().map(|&pos| events[pos].unit.clone()).collect();
    aggregate(ties, &sources, Reduction::Sum)
}

/// Source × target tie weights over every unit in `events`, oriented per
/// `config.direction`.
pub fn tie_matrix<U, C>(events: &[Event<U, C>], config: &WindowConfig) -> Result<AdjacencyMatrix<U>>
where
    U: Hash + Eq + Clone,
    C: Hash + Eq + Clone,
{
    config.validate()?;
    build_matrix(events, TargetRule::Lookback { window: config.window_size }, config)
}

/// Like [`tie_matrix`], but every event ties to the first author(s) of its
/// context. `window_size` is ignored.
pub fn first_author_matrix<U, C>(events: &[Event<U, C>], config: &WindowConfig) -> Result<AdjacencyMatrix<U>>
where
    U: Hash + Eq + Clone,
    C: Hash + Eq + Clone,
{
    config.validate()?;
    build_matrix(events, TargetRule::FirstAuthor, config)
}

/// Windowed tie graph with `weight` and `average` edge attributes and
/// participation counts on every vertex. `groups` adds caller attributes.
pub fn windowed_graph<U, C>(
    events: &[Event<U, C>],
    config: &WindowConfig,
    groups: &VertexTable<U>,
) -> Result<Graph<U>>
where
    U: Hash + Eq + Clone,
    C: Hash + Eq + Clone,
{
    let adjacency = tie_matrix(events, config)?;
    Ok(graph_from_ties(&adjacency, events, config, groups))
}

/// First-author graph: ties from every later event to the context opener.
pub fn first_author_graph<U, C>(
    events: &[Event<U, C>],
    config: &WindowConfig,
    groups: &VertexTable<U>,
) -> Result<Graph<U>>
where
    U: Hash + Eq + Clone,
    C: Hash + Eq + Clone,
{
    let adjacency = first_author_matrix(events, config)?;
    Ok(graph_from_ties(&adjacency, events, config, groups))
}

fn build_matrix<U, C>(events: &[Event<U, C>], rule: TargetRule, config: &WindowConfig) -> Result<AdjacencyMatrix<U>>
where
    U: Hash + Eq + Clone,
    C: Hash + Eq + Clone,
{
    let ties = event_ties(events, rule)?;
    let rollup = if config.count_once {
        dedupe_by_context_then_aggregate(&ties, events)?
    } else {
        aggregate_by_source(&ties, events)?
    };

    let units: LabelIndex<U> = events.iter().map(|e| e.unit.clone()).collect();
    let mut raw = AdjacencyMatrix::zeros(units.labels().to_vec(), true);
    for (src, dst, w) in rollup.matrix.iter() {
        if let (Some(i), Some(j)) = (units.get(src), units.get(dst)) {
            raw.add(i, j, w);
        }
    }

    Ok(match config.direction {
        Direction::DirectedUp => raw,
        Direction::DirectedDown => raw.transpose(),
        Direction::Undirected => raw.symmetrized(),
    })
}

fn graph_from_ties<U, C>(
    adjacency: &AdjacencyMatrix<U>,
    events: &[Event<U, C>],
    config: &WindowConfig,
    groups: &VertexTable<U>,
) -> Graph<U>
where
    U: Hash + Eq + Clone,
    C: Hash + Eq + Clone,
{
    let participation = Participation::from_events(events);
    let vertices = participation.to_table().merged(groups);
    assemble_with(adjacency, &vertices, config.min_weight, |src, _, weight| {
        let n = participation.events(src);
        let average = if n == 0 { 0.0 } else { weight / n as f64 };
        properties([(AVERAGE, average)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn thread(ctx: &'static str, authors: &[&'static str]) -> Vec<Event<&'static str, &'static str>> {
        authors
            .iter()
            .enumerate()
            .map(|(k, a)| Event::in_context(*a, ctx).with_order(k as i64 + 1))
            .collect()
    }

    fn w(m: &AdjacencyMatrix<&'static str>, a: &'static str, b: &'static str) -> f64 {
        m.get_by_label(&a, &b)
    }

    #[test]
    fn test_alternating_thread_window_one() {
        let events = thread("t", &["alice", "bob", "alice", "bob", "bob", "alice"]);
        let m = tie_matrix(&events, &WindowConfig::default()).unwrap();
        assert_eq!(w(&m, "alice", "bob"), 2.0);
        assert_eq!(w(&m, "bob", "alice"), 2.0);
        assert_eq!(w(&m, "bob", "bob"), 1.0);
    }

    #[test]
    fn test_event_contributes_once_per_target() {
        // c at position 3 sees a twice within window 2
        let events = thread("t", &["a", "a", "c"]);
        let ties = event_ties(&events, TargetRule::Lookback { window: 2 }).unwrap();
        assert_eq!(ties.get_by_label(&2, &"a"), 1.0);

        let m = tie_matrix(&events, &WindowConfig::default().with_window_size(2)).unwrap();
        assert_eq!(w(&m, "c", "a"), 1.0);
        assert_eq!(w(&m, "a", "a"), 1.0);
    }

    #[test]
    fn test_count_once_per_context() {
        // b replies to a three times in t1 and once in t2
        let mut events = thread("t1", &["a", "b", "a", "b", "a", "b"]);
        events.extend(thread("t2", &["a", "b"]));
        let plain = tie_matrix(&events, &WindowConfig::default()).unwrap();
        assert_eq!(w(&plain, "b", "a"), 4.0);

        let once = tie_matrix(&events, &WindowConfig::default().with_count_once(true)).unwrap();
        assert_eq!(w(&once, "b", "a"), 2.0);
        assert_eq!(w(&once, "a", "b"), 1.0);
    }

    #[test]
    fn test_dedupe_pipeline_directly() {
        let events = thread("t1", &["a", "b", "a", "b"]);
        let ties = event_ties(&events, TargetRule::Lookback { window: 1 }).unwrap();
        let rollup = dedupe_by_context_then_aggregate(&ties, &events).unwrap();
        assert_eq!(rollup.matrix.get_by_label(&"b", &"a"), 1.0);
        assert_eq!(rollup.matrix.get_by_label(&"a", &"b"), 1.0);
        assert_eq!(rollup.count(&"b"), Some(1));

        let plain = aggregate_by_source(&ties, &events).unwrap();
        assert_eq!(plain.matrix.get_by_label(&"b", &"a"), 2.0);
        assert_eq!(plain.count(&"b"), Some(2));
    }

    #[test]
    fn test_direction() {
        let events = thread("t", &["a", "b"]);
        let up = tie_matrix(&events, &WindowConfig::default()).unwrap();
        assert_eq!((w(&up, "b", "a"), w(&up, "a", "b")), (1.0, 0.0));

        let cfg = WindowConfig::default().with_direction(Direction::DirectedDown);
        let down = tie_matrix(&events, &cfg).unwrap();
        assert_eq!((w(&down, "b", "a"), w(&down, "a", "b")), (0.0, 1.0));

        let cfg = WindowConfig::default().with_direction(Direction::Undirected);
        let both = tie_matrix(&events, &cfg).unwrap();
        assert_eq!((w(&both, "b", "a"), w(&both, "a", "b")), (1.0, 1.0));
        assert!(!both.is_directed());
    }

    #[test]
    fn test_count_once_undirected_doubles_per_context() {
        // Each direction counts once in the context; symmetrizing adds them
        let events = thread("t", &["a", "b", "a", "b"]);
        let cfg = WindowConfig::default().with_count_once(true).with_direction(Direction::Undirected);
        let m = tie_matrix(&events, &cfg).unwrap();
        assert_eq!(w(&m, "a", "b"), 2.0);
        assert_eq!(w(&m, "b", "a"), 2.0);
    }

    #[test]
    fn test_sparse_orders_with_wide_window() {
        let events = vec![
            Event::in_context("a", "t").with_order(1_000),
            Event::in_context("b", "t").with_order(5_000_000),
            Event::in_context("c", "t").with_order(5_000_001),
        ];
        let cfg = WindowConfig::default().with_window_size(usize::MAX);
        let m = tie_matrix(&events, &cfg).unwrap();
        assert_eq!(w(&m, "b", "a"), 1.0);
        assert_eq!(w(&m, "c", "b"), 1.0);
        assert_eq!(w(&m, "c", "a"), 1.0);

        let narrow = tie_matrix(&events, &WindowConfig::default()).unwrap();
        assert_eq!(w(&narrow, "c", "b"), 1.0);
        assert_eq!(w(&narrow, "b", "a") + w(&narrow, "c", "a"), 0.0);
    }

    #[test]
    fn test_orders_do_not_cross_contexts() {
        let mut events = thread("t1", &["a"]);
        events.extend(thread("t2", &["b", "c"]));
        // t2's "b" is at order 1, a's order 1 is in t1: nothing links a and c
        let m = tie_matrix(&events, &WindowConfig::default().with_window_size(5)).unwrap();
        assert_eq!(w(&m, "c", "b"), 1.0);
        assert_eq!(w(&m, "b", "a") + w(&m, "c", "a"), 0.0);
    }

    #[test]
    fn test_gaps_in_order() {
        let events = vec![
            Event::in_context("a", "t").with_order(10),
            Event::in_context("b", "t").with_order(13),
        ];
        let near = tie_matrix(&events, &WindowConfig::default().with_window_size(2)).unwrap();
        assert_eq!(w(&near, "b", "a"), 0.0);
        let far = tie_matrix(&events, &WindowConfig::default().with_window_size(3)).unwrap();
        assert_eq!(w(&far, "b", "a"), 1.0);
    }

    #[test]
    fn test_first_author_mode() {
        let events = thread("t", &["op", "x", "y", "op", "x"]);
        let m = first_author_matrix(&events, &WindowConfig::default()).unwrap();
        assert_eq!(w(&m, "x", "op"), 2.0);
        assert_eq!(w(&m, "y", "op"), 1.0);
        assert_eq!(w(&m, "op", "op"), 1.0);
        assert_eq!(w(&m, "y", "x"), 0.0);

        let once = first_author_matrix(&events, &WindowConfig::default().with_count_once(true)).unwrap();
        assert_eq!(w(&once, "x", "op"), 1.0);
    }

    #[test]
    fn test_missing_order_is_rejected() {
        let events = vec![Event::in_context("a", "t").with_order(1), Event::in_context("b", "t")];
        let err = tie_matrix(&events, &WindowConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { argument: "order", .. }));
        assert!(err.to_string().contains("event 1"));
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let events = thread("t", &["a", "b"]);
        let err = tie_matrix(&events, &WindowConfig::default().with_window_size(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { argument: "window_size", .. }));
    }

    #[test]
    fn test_graph_average() {
        let events = thread("t", &["a", "b", "a", "b"]);
        let g = windowed_graph(&events, &WindowConfig::default(), &VertexTable::new()).unwrap();
        // a answers b once and has two events in total
        let e = g.edge(&"a", &"b").unwrap();
        assert_eq!(e.weight, 1.0);
        assert_eq!(e.get(AVERAGE).and_then(|v| v.as_float()), Some(0.5));
        assert_eq!(g.weight(&"b", &"a"), 2.0);
        assert!(g.edge(&"a", &"a").is_none());
    }

    #[test]
    fn test_undirected_average_uses_first_listed_unit() {
        // a has 2 events, b has 3; a appears first so it is the edge's src
        let events = thread("t", &["a", "b", "a", "b", "b"]);
        let cfg = WindowConfig::default().with_direction(Direction::Undirected);
        let g = windowed_graph(&events, &cfg, &VertexTable::new()).unwrap();
        let e = g.edge(&"b", &"a").unwrap();
        assert_eq!((e.src, e.dst, e.weight), ("a", "b", 3.0));
        assert_eq!(e.get(AVERAGE).and_then(|v| v.as_float()), Some(1.5));
    }
}
