//! Fuzzy Davies-Bouldin index, central and federated.
//!
//! # The Index
//!
//! For each cluster j a **spread** combines the average membership mass with
//! the root-mean-square distance of all points to the center:
//!
//! ```text
//! S[j] = (Σᵢ U[i][j] / N) · sqrt(Σᵢ d(xᵢ, cⱼ)² / N)
//! ```
//!
//! Clusters are compared pairwise against their center separation
//! `M[j][l] = ‖cⱼ - cₗ‖`:
//!
//! ```text
//! R[j][l] = (S[j] + S[l]) / M[j][l]        (j ≠ l)
//! DB      = (1/K) Σⱼ maxₗ≠ⱼ R[j][l]
//! ```
//!
//! Lower is better: dense clusters that are far apart.
//!
//! # Federated Computation
//!
//! Every term of `S[j]` is a sum over points, so it regroups into sums over
//! clients. Each client reports a [`SpreadStatistics`] (squared-distance sums,
//! membership totals, point count) and the reducer adds them up. The score is
//! identical to the central one on the concatenated data, up to floating
//! point rounding.

use crate::distance::{cdist, Metric};
use crate::error::{Error, Result};
use crate::federated::LocalLearner;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Learners accepted by [`federated_fuzzy_db`].
///
/// Any [`LocalLearner`]; with the `parallel` feature it must also be `Sync`.
#[cfg(feature = "parallel")]
pub trait ValidatedLearner: LocalLearner + Sync {}

#[cfg(feature = "parallel")]
impl<T: LocalLearner + Sync + ?Sized> ValidatedLearner for T {}

/// Learners accepted by [`federated_fuzzy_db`].
///
/// Any [`LocalLearner`]; with the `parallel` feature it must also be `Sync`.
#[cfg(not(feature = "parallel"))]
pub trait ValidatedLearner: LocalLearner {}

#[cfg(not(feature = "parallel"))]
impl<T: LocalLearner + ?Sized> ValidatedLearner for T {}

/// Per-cluster sufficient statistics of the fuzzy spread.
///
/// Partial statistics from disjoint data combine with [`merge`](Self::merge);
/// merging is associative and commutative.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadStatistics {
    /// `Σᵢ d(xᵢ, cⱼ)²` per cluster.
    pub sq_dist_sums: Array1<f64>,
    /// `Σᵢ U[i][j]` per cluster.
    pub membership_totals: Array1<f64>,
    /// Number of points summed over.
    pub n_points: usize,
}

impl SpreadStatistics {
    /// Neutral element for `k` clusters.
    pub fn zeros(n_clusters: usize) -> Self {
        Self {
            sq_dist_sums: Array1::zeros(n_clusters),
            membership_totals: Array1::zeros(n_clusters),
            n_points: 0,
        }
    }

    /// Number of clusters `K` the statistics cover.
    pub fn n_clusters(&self) -> usize {
        self.sq_dist_sums.len()
    }

    /// Statistics of `data` against `centers`, given the per-cluster
    /// membership totals of the same points.
    pub fn compute(
        data: ArrayView2<'_, f64>,
        centers: ArrayView2<'_, f64>,
        membership_totals: Array1<f64>,
    ) -> Result<Self> {
        if membership_totals.len() != centers.nrows() {
            return Err(Error::shape(
                format!("{} membership totals", centers.nrows()),
                membership_totals.len(),
            ));
        }
        let sq_dist_sums = cdist(data, centers, &Metric::SqEuclidean)?.sum_axis(Axis(0));
        Ok(Self {
            sq_dist_sums,
            membership_totals,
            n_points: data.nrows(),
        })
    }

    /// Sum of two partial statistics over the same clusters.
    pub fn merge(&self, other: &Self) -> Result<Self> {
        if self.n_clusters() != other.n_clusters() {
            return Err(Error::shape(
                format!("{} clusters", self.n_clusters()),
                format!("{} clusters", other.n_clusters()),
            ));
        }
        Ok(Self {
            sq_dist_sums: &self.sq_dist_sums + &other.sq_dist_sums,
            membership_totals: &self.membership_totals + &other.membership_totals,
            n_points: self.n_points + other.n_points,
        })
    }

    /// Per-cluster spread `S[j]`.
    pub fn spreads(&self) -> Result<Array1<f64>> {
        if self.n_points == 0 {
            return Err(Error::EmptyInput);
        }
        let n = self.n_points as f64;
        Ok(self
            .membership_totals
            .iter()
            .zip(self.sq_dist_sums.iter())
            .map(|(total, sq)| (total / n) * (sq / n).sqrt())
            .collect())
    }
}

/// Davies-Bouldin index from per-cluster spreads and the centers.
///
/// # Errors
///
/// - [`Error::InvalidParameter`] for fewer than two clusters.
/// - [`Error::ShapeMismatch`] if `spreads` and `centers` disagree on K.
/// - [`Error::DegenerateCenters`] if two centers coincide.
pub fn davies_bouldin_from_spreads(
    spreads: ArrayView1<'_, f64>,
    centers: ArrayView2<'_, f64>,
) -> Result<f64> {
    let k = centers.nrows();
    if spreads.len() != k {
        return Err(Error::shape(format!("{k} spreads"), spreads.len()));
    }
    if k < 2 {
        return Err(Error::InvalidParameter {
            name: "n_clusters",
            message: "Davies-Bouldin needs at least two clusters",
        });
    }

    let separation = cdist(centers, centers, &Metric::Euclidean)?;

    let mut total = 0.0;
    for j in 0..k {
        let mut worst = f64::NEG_INFINITY;
        for l in 0..k {
            if l == j {
                continue;
            }
            let m = separation[[j, l]];
            if m == 0.0 {
                return Err(Error::DegenerateCenters {
                    first: j.min(l),
                    second: j.max(l),
                });
            }
            worst = worst.max((spreads[j] + spreads[l]) / m);
        }
        total += worst;
    }

    Ok(total / k as f64)
}

/// Fuzzy Davies-Bouldin index of one dataset.
///
/// `membership` is the `N × K` matrix of `data` under `centers`.
///
/// # Example
///
/// ```rust
/// use fedfuzz::validity::central_fuzzy_db;
/// use ndarray::array;
///
/// let data = array![[0.0, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]];
/// let centers = array![[0.0, 0.5], [10.0, 0.5]];
/// let membership = array![[1.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 1.0]];
///
/// let db = central_fuzzy_db(data.view(), centers.view(), membership.view(), 2).unwrap();
/// assert!((db - 50.25f64.sqrt() / 10.0).abs() < 1e-12);
/// ```
pub fn central_fuzzy_db(
    data: ArrayView2<'_, f64>,
    centers: ArrayView2<'_, f64>,
    membership: ArrayView2<'_, f64>,
    n_clusters: usize,
) -> Result<f64> {
    if data.nrows() == 0 {
        return Err(Error::EmptyInput);
    }
    if centers.nrows() != n_clusters {
        return Err(Error::shape(
            format!("{n_clusters} centers"),
            format!("{} centers", centers.nrows()),
        ));
    }
    if membership.dim() != (data.nrows(), n_clusters) {
        return Err(Error::shape(
            format!("{} x {} membership", data.nrows(), n_clusters),
            format!("{} x {}", membership.nrows(), membership.ncols()),
        ));
    }

    let stats = SpreadStatistics::compute(data, centers, membership.sum_axis(Axis(0)))?;
    let db = davies_bouldin_from_spreads(stats.spreads()?.view(), centers)?;

    debug!(db, n_points = data.nrows(), n_clusters, "central fuzzy Davies-Bouldin");
    Ok(db)
}

/// Federated fuzzy Davies-Bouldin index over a collection of local learners.
///
/// All learners must hold the same centers; they are read once, from the
/// first learner. Each learner contributes only its [`SpreadStatistics`].
/// With the `parallel` feature the per-learner statistics are computed
/// concurrently; they are always reduced in learner order.
///
/// # Errors
///
/// - [`Error::PreconditionViolation`] if `learners` is empty or a learner's
///   centers differ from the first learner's.
/// - [`Error::NotFitted`] if a learner has no centers or support.
/// - [`Error::ShapeMismatch`], [`Error::DegenerateCenters`] as for
///   [`central_fuzzy_db`].
pub fn federated_fuzzy_db<L: ValidatedLearner>(learners: &[L], n_clusters: usize) -> Result<f64> {
    let first = learners.first().ok_or_else(|| {
        Error::PreconditionViolation("federated validation needs at least one learner".to_string())
    })?;
    let centers = first.centers().ok_or(Error::NotFitted)?;
    if centers.nrows() != n_clusters {
        return Err(Error::shape(
            format!("{n_clusters} centers"),
            format!("{} centers", centers.nrows()),
        ));
    }

    for (i, learner) in learners.iter().enumerate().skip(1) {
        let theirs = learner.centers().ok_or(Error::NotFitted)?;
        if theirs != centers {
            return Err(Error::PreconditionViolation(format!(
                "learner {i} holds centers that differ from learner 0"
            )));
        }
    }

    let partials = collect_statistics(learners, centers)?;
    let stats = partials
        .iter()
        .try_fold(SpreadStatistics::zeros(n_clusters), |acc, s| acc.merge(s))?;
    let db = davies_bouldin_from_spreads(stats.spreads()?.view(), centers)?;

    debug!(
        db,
        n_learners = learners.len(),
        n_points = stats.n_points,
        n_clusters,
        "federated fuzzy Davies-Bouldin"
    );
    Ok(db)
}

fn learner_statistics<L: LocalLearner>(
    learner: &L,
    centers: ArrayView2<'_, f64>,
) -> Result<SpreadStatistics> {
    let support = learner.center_support().ok_or(Error::NotFitted)?;
    SpreadStatistics::compute(learner.client_data(), centers, support)
}

#[cfg(feature = "parallel")]
fn collect_statistics<L: ValidatedLearner>(
    learners: &[L],
    centers: ArrayView2<'_, f64>,
) -> Result<Vec<SpreadStatistics>> {
    learners
        .par_iter()
        .map(|learner| learner_statistics(learner, centers))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn collect_statistics<L: ValidatedLearner>(
    learners: &[L],
    centers: ArrayView2<'_, f64>,
) -> Result<Vec<SpreadStatistics>> {
    learners
        .iter()
        .map(|learner| learner_statistics(learner, centers))
        .collect()
}
