//! Row rollup: collapse rows that share a grouping key.
//!
//! Used to merge several documents per author before similarity, and for
//! the message → (context, author) → author collapse of windowed ties.

use std::hash::Hash;

use hashbrown::HashMap;

use super::sparse::finish_rows;
use super::{LabelIndex, SparseMatrix};
use crate::model::event::check_len;
use crate::Result;

/// How the rows of one group are combined, column by column.
///
/// Entries absent from a row count as 0 for `Mean`, `Max` and `Min`.
/// `Custom` folds only the stored entries.
#[derive(Debug, Clone, Copy, Default)]
pub enum Reduction {
    #[default]
    Sum,
    Mean,
    Max,
    Min,
    /// 1 when any contributing row has a stored entry.
    Presence,
    Custom(fn(f64, f64) -> f64),
}

impl Reduction {
    fn combine(self, acc: f64, v: f64) -> f64 {
        match self {
            Reduction::Sum | Reduction::Mean => acc + v,
            Reduction::Max => acc.max(v),
            Reduction::Min => acc.min(v),
            Reduction::Presence => 1.0,
            Reduction::Custom(f) => f(acc, v),
        }
    }

    fn finish(self, acc: f64, present: usize, rows: usize) -> f64 {
        let sparse = present < rows;
        match self {
            Reduction::Sum | Reduction::Custom(_) => acc,
            Reduction::Mean => acc / rows as f64,
            Reduction::Max if sparse => acc.max(0.0),
            Reduction::Min if sparse => acc.min(0.0),
            Reduction::Max | Reduction::Min => acc,
            Reduction::Presence => 1.0,
        }
    }
}

/// Result of a rollup: one row per distinct key plus row counts.
#[derive(Debug, Clone)]
pub struct Rollup<G, C> {
    pub matrix: SparseMatrix<G, C>,
    /// `counts[g]` is the number of input rows that formed group `g`.
    pub counts: Vec<usize>,
}

impl<G: Hash + Eq + Clone, C: Hash + Eq + Clone> Rollup<G, C> {
    pub fn groups(&self) -> &[G] {
        self.matrix.row_labels()
    }

    pub fn count(&self, key: &G) -> Option<usize> {
        self.matrix.row_index(key).map(|g| self.counts[g])
    }
}

/// Roll up the rows of `matrix` by `keys` (one per row).
///
/// Groups appear in first-occurrence order of their key; the column axis is
/// carried over unchanged.
pub fn aggregate<R, C, G>(
    matrix: &SparseMatrix<R, C>,
    keys: &[G],
    reduction: Reduction,
) -> Result<Rollup<G, C>>
where
    C: Hash + Eq + Clone,
    G: Hash + Eq + Clone,
{
    check_len("keys", matrix.n_rows(), Some(keys.len()))?;

    let mut groups = LabelIndex::new();
    let mut counts: Vec<usize> = Vec::new();
    let mut acc: Vec<HashMap<usize, (f64, usize)>> = Vec::new();

    for (i, key) in keys.iter().enumerate() {
        let g = groups.intern(key.clone());
        if g == counts.len() {
            counts.push(0);
            acc.push(HashMap::new());
        }
        counts[g] += 1;
        for &(j, v) in matrix.row(i) {
            acc[g]
                .entry(j)
                .and_modify(|(sum, n)| {
                    *sum = reduction.combine(*sum, v);
                    *n += 1;
                })
                .or_insert((v, 1));
        }
    }

    let rows = acc
        .into_iter()
        .zip(&counts)
        .map(|(cells, &n)| {
            cells
                .into_iter()
                .map(|(j, (folded, present))| (j, reduction.finish(folded, present, n)))
                .collect()
        })
        .collect();

    let matrix = SparseMatrix::from_parts(groups, matrix.col_index_table().clone(), finish_rows(rows));
    tracing::debug!(
        groups = matrix.n_rows(),
        rows_in = keys.len(),
        nnz = matrix.nnz(),
        "rolled up matrix rows"
    );
    Ok(Rollup { matrix, counts })
}
