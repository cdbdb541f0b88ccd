//! # Similarity Engine
//!
//! Pairwise similarity between the rows of a sparse matrix (units × features).
//!
//! Every measure reduces to sums of products over shared columns, so the
//! engine walks the matrix column by column and only visits pairs of units
//! that actually co-occur:
//!
//! ```text
//! for each column c:
//!     for each (i, x_i), (j, x_j) stored in c:
//!         cross[i,j] += f(x_i) · f(x_j)
//! ```
//!
//! `f` is the identity for cosine/correlation, presence for the count
//! measures and `1 − (1/α)^x` for conditional probability. The resulting
//! U × U matrix is the only dense structure.
//!
//! Any ratio with a zero denominator is 0. No measure returns NaN.

pub mod measure;

pub use measure::Measure;

use std::hash::Hash;

use crate::assemble::{assemble, VertexTable};
use crate::config::SimilarityConfig;
use crate::matrix::{AdjacencyMatrix, SparseMatrix};
use crate::model::Graph;
use crate::{Error, Result};

/// Default saturation base for `ConditionalProbability`.
pub const DEFAULT_ALPHA: f64 = 2.0;

/// Relative tolerance under which a variance is treated as zero.
const VARIANCE_EPS: f64 = 1e-12;

/// Square similarity matrix over the rows of `matrix`.
///
/// `alpha` is only read by `ConditionalProbability` but must be positive
/// and finite regardless.
pub fn similarity_matrix<R, C>(
    matrix: &SparseMatrix<R, C>,
    measure: Measure,
    alpha: f64,
) -> Result<AdjacencyMatrix<R>>
where
    R: Hash + Eq + Clone,
    C: Hash + Eq + Clone,
{
    check_alpha(alpha)?;

    let labels = matrix.row_labels().to_vec();
    let result = match measure {
        Measure::Cosine => cosine(matrix, labels),
        Measure::Correlation => correlation(matrix, labels),
        Measure::CoincidenceCount => cross_products(&matrix.binarize(), labels, false),
        Measure::OverlapJacard => {
            let present = matrix.binarize();
            normalize_by_target(cross_products(&present, labels, true), &present.row_totals())
        }
        Measure::ConditionalProbability => {
            let saturated = matrix.map_values(|v| saturate(v, alpha));
            normalize_by_target(cross_products(&saturated, labels, true), &saturated.row_totals())
        }
    };

    tracing::debug!(
        measure = %measure,
        units = result.size(),
        features = matrix.n_cols(),
        ties = result.off_diagonal_nnz(),
        "computed similarity matrix"
    );
    Ok(result)
}

/// Similarity graph: directed iff the measure is asymmetric, diagonal
/// dropped, edges under `min_similarity` removed.
pub fn similarity_graph<R, C>(
    matrix: &SparseMatrix<R, C>,
    config: &SimilarityConfig,
    vertices: &VertexTable<R>,
) -> Result<Graph<R>>
where
    R: Hash + Eq + Clone,
    C: Hash + Eq + Clone,
{
    config.validate()?;
    let adjacency = similarity_matrix(matrix, config.measure, config.alpha)?;
    Ok(assemble(&adjacency, vertices, config.min_similarity))
}

/// `1 − (1/α)^value`: 0 at value 0, approaching 1 as the value grows.
pub fn saturate(value: f64, alpha: f64) -> f64 {
    1.0 - alpha.recip().powf(value)
}

pub(crate) fn check_alpha(alpha: f64) -> Result<()> {
    if alpha > 0.0 && alpha.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidInput {
            argument: "alpha",
            message: format!("must be a positive finite number, got {alpha}"),
        })
    }
}

/// `cross[i,j] = Σ_c x_ic · x_jc`, accumulated over shared columns only.
fn cross_products<R, C>(matrix: &SparseMatrix<R, C>, labels: Vec<R>, directed: bool) -> AdjacencyMatrix<R> {
    let mut cross = AdjacencyMatrix::zeros(labels, directed);
    for column in matrix.column_lists() {
        for &(i, xi) in &column {
            for &(j, xj) in &column {
                cross.add(i, j, xi * xj);
            }
        }
    }
    cross
}

/// `result[i,j] = cross[i,j] / totals[j]`, with `totals` the row sums of the
/// transformed matrix. With values in `[0, 1]` every entry stays in `[0, 1]`.
fn normalize_by_target<R: Clone>(cross: AdjacencyMatrix<R>, totals: &[f64]) -> AdjacencyMatrix<R> {
    AdjacencyMatrix::from_fn(cross.labels().to_vec(), cross.is_directed(), |i, j| {
        ratio(cross.get(i, j), totals[j])
    })
}

fn cosine<R: Clone, C>(matrix: &SparseMatrix<R, C>, labels: Vec<R>) -> AdjacencyMatrix<R> {
    let cross = cross_products(matrix, labels, false);
    let norms: Vec<f64> = cross.diagonal().into_iter().map(f64::sqrt).collect();
    AdjacencyMatrix::from_fn(cross.labels().to_vec(), false, |i, j| {
        ratio(cross.get(i, j), norms[i] * norms[j])
    })
}

/// Pearson correlation from sum-of-products identities:
/// `cov = Σxy − ΣxΣy/n`, `var = Σx² − (Σx)²/n`, `n` = number of features.
fn correlation<R: Clone, C>(matrix: &SparseMatrix<R, C>, labels: Vec<R>) -> AdjacencyMatrix<R> {
    let n = matrix.n_cols() as f64;
    let sums = matrix.row_totals();
    let cross = cross_products(matrix, labels, false);

    let variance: Vec<f64> = (0..cross.size())
        .map(|i| {
            let sq = cross.get(i, i);
            let var = if n > 0.0 { sq - sums[i] * sums[i] / n } else { 0.0 };
            if var <= VARIANCE_EPS * sq { 0.0 } else { var }
        })
        .collect();

    AdjacencyMatrix::from_fn(cross.labels().to_vec(), false, |i, j| {
        if n == 0.0 {
            return 0.0;
        }
        let cov = cross.get(i, j) - sums[i] * sums[j] / n;
        ratio(cov, (variance[i] * variance[j]).sqrt())
    })
}

/// Division that resolves zero or non-finite denominators to 0.
fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 || !den.is_finite() {
        return 0.0;
    }
    let r = num / den;
    if r.is_finite() { r } else { 0.0 }
}
