//! Sparse labeled incidence matrix.
//!
//! Rows and columns carry labels in first-occurrence order. Entries are
//! stored row-major, each row sorted by column index. Duplicate coordinates
//! are summed on construction and coordinates that sum to exactly zero are
//! not stored.

use std::hash::Hash;

use hashbrown::HashMap;

use super::LabelIndex;
use crate::model::Event;
use crate::model::event::check_len;
use crate::Result;

/// Sparse `rows × cols` matrix of `f64` with labeled axes.
#[derive(Debug, Clone)]
pub struct SparseMatrix<R, C> {
    rows: LabelIndex<R>,
    cols: LabelIndex<C>,
    entries: Vec<Vec<(usize, f64)>>,
}

impl<R: Hash + Eq + Clone, C: Hash + Eq + Clone> SparseMatrix<R, C> {
    /// Build from `(row, col, value)` triples.
    pub fn from_triples(triples: impl IntoIterator<Item = (R, C, f64)>) -> Self {
        let mut rows = LabelIndex::new();
        let mut cols = LabelIndex::new();
        let mut acc: Vec<HashMap<usize, f64>> = Vec::new();

        for (r, c, v) in triples {
            let i = rows.intern(r);
            let j = cols.intern(c);
            if i == acc.len() {
                acc.push(HashMap::new());
            }
            *acc[i].entry(j).or_insert(0.0) += v;
        }

        let entries = acc.into_iter().map(finish_row).collect();
        Self { rows, cols, entries }
    }

    /// Build from parallel row/column/value sequences. Values default to 1.
    pub fn from_parallel(rows: &[R], cols: &[C], values: Option<&[f64]>) -> Result<Self> {
        check_len("cols", rows.len(), Some(cols.len()))?;
        check_len("values", rows.len(), values.map(<[f64]>::len))?;

        let matrix = Self::from_triples(rows.iter().zip(cols).enumerate().map(|(k, (r, c))| {
            let v = values.map_or(1.0, |vals| vals[k]);
            (r.clone(), c.clone(), v)
        }));
        tracing::debug!(
            rows = matrix.n_rows(),
            cols = matrix.n_cols(),
            nnz = matrix.nnz(),
            "built sparse matrix"
        );
        Ok(matrix)
    }

    /// Unit × context incidence matrix weighted by event value.
    ///
    /// Every event must carry a context.
    pub fn from_events(events: &[Event<R, C>]) -> Result<Self> {
        let mut triples = Vec::with_capacity(events.len());
        for (pos, e) in events.iter().enumerate() {
            let ctx = e.require_context(pos)?;
            triples.push((e.unit.clone(), ctx.clone(), e.value));
        }
        Ok(Self::from_triples(triples))
    }

    pub fn row_index(&self, label: &R) -> Option<usize> {
        self.rows.get(label)
    }

    pub fn col_index(&self, label: &C) -> Option<usize> {
        self.cols.get(label)
    }

    /// Value at labeled coordinates, 0 when either label is unknown.
    pub fn get_by_label(&self, row: &R, col: &C) -> f64 {
        match (self.rows.get(row), self.cols.get(col)) {
            (Some(i), Some(j)) => self.get(i, j),
            _ => 0.0,
        }
    }

    /// Apply `f` to every stored value, keeping both label axes.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&(j, v)| (j, f(v)))
                    .filter(|&(_, v)| v != 0.0)
                    .collect()
            })
            .collect();
        Self { rows: self.rows.clone(), cols: self.cols.clone(), entries }
    }

    /// Presence/absence: positive values become 1, everything else 0.
    pub fn binarize(&self) -> Self {
        self.map_values(|v| if v > 0.0 { 1.0 } else { 0.0 })
    }
}

impl<R, C> SparseMatrix<R, C> {
    pub(crate) fn from_parts(
        rows: LabelIndex<R>,
        cols: LabelIndex<C>,
        entries: Vec<Vec<(usize, f64)>>,
    ) -> Self {
        debug_assert_eq!(rows.len(), entries.len());
        Self { rows, cols, entries }
    }

    pub(crate) fn col_index_table(&self) -> &LabelIndex<C> {
        &self.cols
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.cols.len()
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.entries.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_labels(&self) -> &[R] {
        self.rows.labels()
    }

    pub fn col_labels(&self) -> &[C] {
        self.cols.labels()
    }

    /// Stored `(col, value)` pairs of row `i`, sorted by column.
    pub fn row(&self, i: usize) -> &[(usize, f64)] {
        &self.entries[i]
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        let row = &self.entries[i];
        match row.binary_search_by_key(&j, |&(col, _)| col) {
            Ok(pos) => row[pos].1,
            Err(_) => 0.0,
        }
    }

    /// All stored entries as labeled triples, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (&R, &C, f64)> + '_ {
        self.entries.iter().enumerate().flat_map(move |(i, row)| {
            row.iter().map(move |&(j, v)| (self.rows.label(i), self.cols.label(j), v))
        })
    }

    /// Sum of all stored values.
    pub fn total(&self) -> f64 {
        self.entries.iter().flatten().map(|&(_, v)| v).sum()
    }

    pub fn row_totals(&self) -> Vec<f64> {
        self.entries.iter().map(|row| row.iter().map(|&(_, v)| v).sum()).collect()
    }

    /// Column-major view: for every column, the `(row, value)` pairs in it.
    pub(crate) fn column_lists(&self) -> Vec<Vec<(usize, f64)>> {
        let mut cols = vec![Vec::new(); self.n_cols()];
        for (i, row) in self.entries.iter().enumerate() {
            for &(j, v) in row {
                cols[j].push((i, v));
            }
        }
        cols
    }
}

fn finish_row(row: HashMap<usize, f64>) -> Vec<(usize, f64)> {
    let mut row: Vec<(usize, f64)> = row.into_iter().filter(|&(_, v)| v != 0.0).collect();
    row.sort_unstable_by_key(|&(j, _)| j);
    row
}

pub(crate) fn finish_rows(rows: Vec<HashMap<usize, f64>>) -> Vec<Vec<(usize, f64)>> {
    rows.into_iter().map(finish_row).collect()
}
