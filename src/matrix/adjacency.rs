//! Dense square unit × unit matrix.
//!
//! Only produced as a final output (similarity or tie weights), so it is
//! stored densely, row-major.

use serde::{Deserialize, Serialize};

/// Square matrix of tie weights over labeled units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjacencyMatrix<U> {
    labels: Vec<U>,
    values: Vec<f64>,
    directed: bool,
}

impl<U> AdjacencyMatrix<U> {
    pub fn zeros(labels: Vec<U>, directed: bool) -> Self {
        let n = labels.len();
        Self { labels, values: vec![0.0; n * n], directed }
    }

    /// Fill every cell from `f(row, col)`.
    pub fn from_fn(labels: Vec<U>, directed: bool, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let n = labels.len();
        let mut values = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                values.push(f(i, j));
            }
        }
        Self { labels, values, directed }
    }

    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[U] {
        &self.labels
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size() + j]
    }

    pub(crate) fn add(&mut self, i: usize, j: usize, v: f64) {
        let n = self.size();
        self.values[i * n + j] += v;
    }

    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.size()).map(|i| self.get(i, i)).collect()
    }

    /// Number of non-zero off-diagonal cells.
    pub fn off_diagonal_nnz(&self) -> usize {
        let n = self.size();
        (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .filter(|&(i, j)| i != j && self.get(i, j) != 0.0)
            .count()
    }

    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        let n = self.size();
        (0..n).all(|i| (i + 1..n).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tolerance))
    }
}

impl<U: Clone> AdjacencyMatrix<U> {
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.labels.clone(), self.directed, |i, j| self.get(j, i))
    }

    /// `w[i,j] + w[j,i]` off the diagonal; the diagonal is kept as is.
    pub fn symmetrized(&self) -> Self {
        Self::from_fn(self.labels.clone(), false, |i, j| {
            if i == j { self.get(i, i) } else { self.get(i, j) + self.get(j, i) }
        })
    }
}

impl<U: PartialEq> AdjacencyMatrix<U> {
    pub fn index_of(&self, label: &U) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Value between two labeled units, 0 when either is unknown.
    pub fn get_by_label(&self, src: &U, dst: &U) -> f64 {
        match (self.index_of(src), self.index_of(dst)) {
            (Some(i), Some(j)) => self.get(i, j),
            _ => 0.0,
        }
    }
}
