//! Clustering traits.

use crate::error::Result;
use ndarray::{Array2, ArrayView2};

/// Trait for clustering algorithms.
pub trait Clustering {
    /// Fit the model to data and return cluster assignments.
    ///
    /// Returns a vector of cluster labels, one per input row.
    fn fit_predict(&mut self, data: ArrayView2<'_, f64>) -> Result<Vec<usize>>;

    /// Get the number of clusters.
    fn n_clusters(&self) -> usize;
}

/// Trait for soft clustering algorithms that return graded memberships.
pub trait SoftClustering: Clustering {
    /// Fit and return soft cluster assignments.
    ///
    /// Returns an `N × K` matrix where entry \[i, k\] is the membership of
    /// row i in cluster k; every row sums to 1.
    fn fit_predict_proba(&mut self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>>;
}

/// Hard labels from a membership matrix (arg-max per row).
///
/// Ties resolve to the lowest cluster index.
pub fn defuzzify(membership: ArrayView2<'_, f64>) -> Vec<usize> {
    membership
        .outer_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |best, (j, &u)| {
                    if u > best.1 {
                        (j, u)
                    } else {
                        best
                    }
                })
                .0
        })
        .collect()
}
