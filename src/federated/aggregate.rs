//! Support-weighted averaging of local centers.
//!
//! FedAvg with per-cluster weights: each client's center j counts in
//! proportion to the membership mass the client assigned to cluster j.
//!
//! ```text
//! C[j] = Σₗ support_l[j] · C_l[j] / Σₗ support_l[j]
//! ```
//!
//! A cluster that no client supports falls back to the plain mean of the
//! local centers.

use super::learner::LocalLearner;
use crate::error::{Error, Result};
use ndarray::Array2;
use tracing::debug;

/// Merge the local centers of `learners` into one global center set.
///
/// # Errors
///
/// - [`Error::PreconditionViolation`] if `learners` is empty.
/// - [`Error::NotFitted`] if a learner has no centers or support.
/// - [`Error::ShapeMismatch`] if center shapes or support lengths disagree.
pub fn aggregate_centers<L: LocalLearner>(learners: &[L]) -> Result<Array2<f64>> {
    let first = learners
        .first()
        .ok_or_else(|| Error::PreconditionViolation("no local learners to aggregate".to_string()))?;
    let shape = first.centers().ok_or(Error::NotFitted)?.dim();
    let (k, _) = shape;

    let mut weighted = Array2::<f64>::zeros(shape);
    let mut plain = Array2::<f64>::zeros(shape);
    let mut totals = vec![0.0; k];

    for learner in learners {
        let centers = learner.centers().ok_or(Error::NotFitted)?;
        let support = learner.center_support().ok_or(Error::NotFitted)?;
        if centers.dim() != shape {
            return Err(Error::shape(
                format!("{} x {} centers", shape.0, shape.1),
                format!("{} x {}", centers.nrows(), centers.ncols()),
            ));
        }
        if support.len() != k {
            return Err(Error::shape(
                format!("support of length {k}"),
                format!("length {}", support.len()),
            ));
        }

        for (j, center) in centers.outer_iter().enumerate() {
            weighted.row_mut(j).scaled_add(support[j], &center);
            plain.row_mut(j).scaled_add(1.0, &center);
            totals[j] += support[j];
        }
    }

    let n_learners = learners.len() as f64;
    for (j, total) in totals.iter().enumerate() {
        if *total > 0.0 {
            weighted.row_mut(j).mapv_inplace(|x| x / total);
        } else {
            weighted
                .row_mut(j)
                .assign(&plain.row(j).mapv(|x| x / n_learners));
        }
    }

    debug!(
        n_learners = learners.len(),
        n_clusters = k,
        "aggregated local centers"
    );
    Ok(weighted)
}
