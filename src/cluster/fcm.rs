//! Fuzzy C-Means clustering.
//!
//! Partitions data into k clusters where every point carries a graded
//! membership in **every** cluster (Bezdek, 1981). Minimizes:
//!
//! ```text
//! J_m = Σᵢ Σⱼ U[i][j]^m · d(xᵢ, cⱼ)²
//! ```
//!
//! subject to `Σⱼ U[i][j] = 1` for every point i.
//!
//! # Alternating Updates
//!
//! Starting from an initial partition:
//!
//! 1. **Centers**: each center → mean of all points weighted by `U^m`
//!    ```text
//!    cⱼ = Σᵢ U[i][j]^m · xᵢ / Σᵢ U[i][j]^m
//!    ```
//! 2. **Membership**: each point → inverse relative distance to every center
//!    ```text
//!    U[i][j] = 1 / Σₗ (d(i,j) / d(i,l))^(2/(m-1))
//!    ```
//! 3. Stop when `‖U - U_prev‖_F < tol` or after `max_iter` iterations.
//!
//! # The Fuzziness Exponent
//!
//! `m → 1` approaches hard k-means assignments; larger `m` flattens the
//! memberships towards `1/k`. `m = 2` is the usual choice.
//!
//! # Initialization
//!
//! - [`Initialization::Random`]: integer-valued centers drawn from
//!   [`RANDOM_CENTER_RANGE`]. Crude, but adequate for min-max normalized data.
//! - [`Initialization::RandomMembership`]: a random row-normalized membership
//!   matrix, from which the first centers are derived.
//! - [`Initialization::Federated`]: centers injected beforehand through
//!   [`FuzzyCMeans::set_centers`], typically distributed by a coordinator so
//!   that every client starts from the same centers.
//!
//! # Coincident Points
//!
//! A point lying exactly on a center has `d = 0` and the ratio above is
//! undefined. Such a point gets full membership in the coincident center
//! (split evenly if several centers coincide with it) and 0 elsewhere.

use super::traits::{defuzzify, Clustering, SoftClustering};
use crate::distance::{cdist, Metric};
use crate::error::{Error, Result};
use core::ops::RangeInclusive;
use core::str::FromStr;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use tracing::{debug, trace, warn};

/// Range of the integer-valued entries drawn by [`Initialization::Random`].
pub const RANDOM_CENTER_RANGE: RangeInclusive<i32> = -100..=100;

/// How `fit` obtains its starting partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initialization {
    /// Random integer-valued centers.
    Random,
    /// Random row-normalized membership matrix.
    RandomMembership,
    /// Centers injected with [`FuzzyCMeans::set_centers`].
    Federated,
}

impl FromStr for Initialization {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Initialization::Random),
            "random_membership" => Ok(Initialization::RandomMembership),
            "federated" => Ok(Initialization::Federated),
            _ => Err(Error::InvalidParameter {
                name: "initialization",
                message: "expected 'random', 'random_membership' or 'federated'",
            }),
        }
    }
}

/// Lifecycle of a [`FuzzyCMeans`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FcmState {
    /// No centers yet.
    Uninitialized,
    /// Centers injected, membership not computed.
    Initialized,
    /// Centers and membership from the latest `fit`.
    Fitted,
}

/// Configuration for [`FuzzyCMeans`].
#[derive(Debug, Clone, PartialEq)]
pub struct FcmConfig {
    /// Number of clusters (k >= 1).
    pub n_clusters: usize,
    /// Fuzziness exponent (m > 1).
    pub fuzziness: f64,
    /// Maximum iterations per `fit` call (>= 1).
    pub max_iter: usize,
    /// Convergence tolerance on the membership change (> 0).
    pub tol: f64,
    /// Point-to-center distance.
    pub metric: Metric,
    /// Random seed.
    pub seed: Option<u64>,
}

impl FcmConfig {
    /// Default configuration for `k` clusters.
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            fuzziness: 2.0,
            max_iter: 1000,
            tol: 1e-4,
            metric: Metric::Euclidean,
            seed: None,
        }
    }

    /// Set the fuzziness exponent.
    pub fn with_fuzziness(mut self, m: f64) -> Self {
        self.fuzziness = m;
        self
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every parameter, failing with [`Error::InvalidParameter`].
    pub fn validate(&self) -> Result<()> {
        if self.n_clusters == 0 {
            return Err(Error::InvalidParameter {
                name: "n_clusters",
                message: "must be >= 1",
            });
        }
        if !(self.fuzziness > 1.0) || !self.fuzziness.is_finite() {
            return Err(Error::InvalidParameter {
                name: "fuzziness",
                message: "must be a finite value > 1",
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be >= 1",
            });
        }
        if !(self.tol > 0.0) {
            return Err(Error::InvalidParameter {
                name: "tol",
                message: "must be > 0",
            });
        }
        Ok(())
    }
}

/// Outcome of a single [`FuzzyCMeans::fit`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitSummary {
    /// Iterations run by this call (at most `max_iter`).
    pub iterations: usize,
    /// Whether the membership change fell below `tol`.
    pub converged: bool,
    /// Frobenius norm of the last membership change.
    pub final_shift: f64,
}

/// Fuzzy C-Means optimizer.
///
/// Holds only the latest centers and membership matrix. The iteration counter
/// accumulates over repeated `fit` calls.
#[derive(Debug, Clone)]
pub struct FuzzyCMeans {
    config: FcmConfig,
    centers: Option<Array2<f64>>,
    membership: Option<Array2<f64>>,
    n_iter: usize,
}

impl FuzzyCMeans {
    /// Create an optimizer from a validated configuration.
    pub fn new(config: FcmConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            centers: None,
            membership: None,
            n_iter: 0,
        })
    }

    /// Shorthand for `new(FcmConfig::new(k).with_fuzziness(m)...)`.
    pub fn with_params(n_clusters: usize, m: f64, max_iter: usize, tol: f64) -> Result<Self> {
        Self::new(
            FcmConfig::new(n_clusters)
                .with_fuzziness(m)
                .with_max_iter(max_iter)
                .with_tol(tol),
        )
    }

    /// Configuration the optimizer was built with.
    pub fn config(&self) -> &FcmConfig {
        &self.config
    }

    /// Fuzzifier `m`.
    pub fn fuzziness(&self) -> f64 {
        self.config.fuzziness
    }

    /// Iteration cap per `fit` call.
    pub fn max_iter(&self) -> usize {
        self.config.max_iter
    }

    /// Convergence tolerance on the membership change.
    pub fn tol(&self) -> f64 {
        self.config.tol
    }

    /// Current centers (`k × D`), if any.
    pub fn centers(&self) -> Option<&Array2<f64>> {
        self.centers.as_ref()
    }

    /// Membership matrix from the latest `fit`, if any.
    pub fn membership(&self) -> Option<&Array2<f64>> {
        self.membership.as_ref()
    }

    /// Cumulative iterations over all `fit` calls.
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Lifecycle state derived from which of centers and membership are set.
    pub fn state(&self) -> FcmState {
        match (&self.centers, &self.membership) {
            (None, _) => FcmState::Uninitialized,
            (Some(_), None) => FcmState::Initialized,
            (Some(_), Some(_)) => FcmState::Fitted,
        }
    }

    /// Per-cluster total membership (column sums of the membership matrix).
    pub fn center_support(&self) -> Option<Array1<f64>> {
        self.membership.as_ref().map(|u| u.sum_axis(Axis(0)))
    }

    /// Inject centers, e.g. the common starting centers of a federation.
    ///
    /// Discards any membership from a previous `fit`; the iteration counter
    /// is kept.
    pub fn set_centers(&mut self, centers: Array2<f64>) -> Result<()> {
        if centers.nrows() != self.config.n_clusters || centers.ncols() == 0 {
            return Err(Error::shape(
                format!("{} x D centers", self.config.n_clusters),
                format!("{} x {}", centers.nrows(), centers.ncols()),
            ));
        }
        if centers.iter().any(|c| !c.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "centers",
                message: "must be finite",
            });
        }
        self.centers = Some(centers);
        self.membership = None;
        Ok(())
    }

    /// Fit the model to `data` (`N × D`).
    ///
    /// `Random` and `RandomMembership` bootstrap a fresh partition, except
    /// when the model is already fitted on the same number of rows: then the
    /// previous membership is the warm start. `Federated` requires centers
    /// from [`set_centers`](Self::set_centers) and derives the first
    /// membership from them.
    ///
    /// Centers, membership and the iteration counter are only updated when
    /// the whole call succeeds.
    pub fn fit(&mut self, data: ArrayView2<'_, f64>, init: Initialization) -> Result<FitSummary> {
        check_data(data)?;

        let m = self.config.fuzziness;
        let metric = &self.config.metric;

        let (mut centers, mut membership) = match init {
            Initialization::Federated => {
                let centers = self.centers.clone().ok_or_else(|| {
                    Error::PreconditionViolation(
                        "federated initialization requires centers from set_centers".to_string(),
                    )
                })?;
                check_dims(&centers, data)?;
                let membership = membership_matrix(data, centers.view(), m, metric)?;
                (centers, membership)
            }
            Initialization::Random | Initialization::RandomMembership => {
                match (&self.centers, &self.membership) {
                    (Some(c), Some(u)) if u.nrows() == data.nrows() && c.ncols() == data.ncols() => {
                        (c.clone(), u.clone())
                    }
                    _ => self.bootstrap(data, init)?,
                }
            }
        };

        let mut summary = FitSummary {
            iterations: 0,
            converged: false,
            final_shift: f64::INFINITY,
        };

        for _ in 0..self.config.max_iter {
            centers = update_centers(data, membership.view(), m, Some(centers.view()));
            let next = membership_matrix(data, centers.view(), m, metric)?;
            let shift = frobenius_distance(next.view(), membership.view());
            membership = next;

            summary.iterations += 1;
            summary.final_shift = shift;
            trace!(iteration = summary.iterations, shift, "fcm iteration");

            if shift < self.config.tol {
                summary.converged = true;
                break;
            }
        }

        if summary.converged {
            debug!(
                iterations = summary.iterations,
                shift = summary.final_shift,
                n_points = data.nrows(),
                n_clusters = self.config.n_clusters,
                "fcm converged"
            );
        } else {
            warn!(
                max_iter = self.config.max_iter,
                shift = summary.final_shift,
                tol = self.config.tol,
                "fcm stopped at max_iter before reaching tol"
            );
        }

        self.centers = Some(centers);
        self.membership = Some(membership);
        self.n_iter += summary.iterations;
        Ok(summary)
    }

    /// Membership of `data` against the current centers.
    ///
    /// Leaves centers, membership and the iteration counter untouched.
    pub fn predict(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let centers = self.centers.as_ref().ok_or(Error::NotFitted)?;
        check_data(data)?;
        check_dims(centers, data)?;
        membership_matrix(data, centers.view(), self.config.fuzziness, &self.config.metric)
    }

    /// FCM objective `J_m` of `data` under the current centers.
    pub fn objective(&self, data: ArrayView2<'_, f64>) -> Result<f64> {
        let centers = self.centers.as_ref().ok_or(Error::NotFitted)?;
        let membership = self.predict(data)?;
        let dist = cdist(data, centers.view(), &self.config.metric)?;
        let m = self.config.fuzziness;
        Ok(membership
            .iter()
            .zip(dist.iter())
            .map(|(u, d)| u.powf(m) * d * d)
            .sum())
    }

    fn bootstrap(
        &self,
        data: ArrayView2<'_, f64>,
        init: Initialization,
    ) -> Result<(Array2<f64>, Array2<f64>)> {
        let mut rng: Box<dyn RngCore> = match self.config.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        let k = self.config.n_clusters;
        let m = self.config.fuzziness;

        if init == Initialization::RandomMembership {
            let mut membership =
                Array2::from_shape_fn((data.nrows(), k), |_| rng.random_range(f64::EPSILON..1.0));
            for mut row in membership.outer_iter_mut() {
                let total = row.sum();
                row.mapv_inplace(|u| u / total);
            }
            let centers = update_centers(data, membership.view(), m, None);
            return Ok((centers, membership));
        }

        let centers = random_integer_centers(k, data.ncols(), &mut rng)?;
        let membership = membership_matrix(data, centers.view(), m, &self.config.metric)?;
        Ok((centers, membership))
    }
}

impl Clustering for FuzzyCMeans {
    fn fit_predict(&mut self, data: ArrayView2<'_, f64>) -> Result<Vec<usize>> {
        let membership = self.fit_predict_proba(data)?;
        Ok(defuzzify(membership.view()))
    }

    fn n_clusters(&self) -> usize {
        self.config.n_clusters
    }
}

impl SoftClustering for FuzzyCMeans {
    fn fit_predict_proba(&mut self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let init = if self.state() == FcmState::Initialized {
            Initialization::Federated
        } else {
            Initialization::RandomMembership
        };
        self.fit(data, init)?;
        self.membership.clone().ok_or(Error::NotFitted)
    }
}

fn check_data(data: ArrayView2<'_, f64>) -> Result<()> {
    if data.nrows() == 0 || data.ncols() == 0 {
        return Err(Error::EmptyInput);
    }
    if data.iter().any(|x| !x.is_finite()) {
        return Err(Error::InvalidParameter {
            name: "data",
            message: "must be finite",
        });
    }
    Ok(())
}

fn check_dims(centers: &Array2<f64>, data: ArrayView2<'_, f64>) -> Result<()> {
    if centers.ncols() != data.ncols() {
        return Err(Error::shape(
            format!("{} columns", centers.ncols()),
            format!("{} columns", data.ncols()),
        ));
    }
    Ok(())
}

/// `k` distinct integer-valued centers of dimension `d`.
fn random_integer_centers(k: usize, d: usize, rng: &mut impl Rng) -> Result<Array2<f64>> {
    let span = (RANDOM_CENTER_RANGE.end() - RANDOM_CENTER_RANGE.start() + 1) as f64;
    if span.powi(d.min(i32::MAX as usize) as i32) < k as f64 {
        return Err(Error::InvalidParameter {
            name: "n_clusters",
            message: "too many clusters for distinct random integer centers",
        });
    }

    let mut centers = Array2::zeros((k, d));
    let mut j = 0;
    while j < k {
        for x in centers.row_mut(j).iter_mut() {
            *x = f64::from(rng.random_range(RANDOM_CENTER_RANGE));
        }
        let duplicate = (0..j).any(|l| centers.row(l) == centers.row(j));
        if !duplicate {
            j += 1;
        }
    }
    Ok(centers)
}

/// Membership matrix (`N × k`) of `data` with respect to `centers`.
pub(crate) fn membership_matrix(
    data: ArrayView2<'_, f64>,
    centers: ArrayView2<'_, f64>,
    m: f64,
    metric: &Metric,
) -> Result<Array2<f64>> {
    let dist = cdist(data, centers, metric)?;
    let power = 2.0 / (m - 1.0);
    let mut membership = Array2::zeros(dist.dim());

    for (row, mut out) in dist.outer_iter().zip(membership.outer_iter_mut()) {
        let coincident = row.iter().filter(|&&d| d == 0.0).count();
        if coincident > 0 {
            let share = 1.0 / coincident as f64;
            for (u, &d) in out.iter_mut().zip(row.iter()) {
                if d == 0.0 {
                    *u = share;
                }
            }
            continue;
        }

        for (u, &dj) in out.iter_mut().zip(row.iter()) {
            let denom: f64 = row.iter().map(|&dl| (dj / dl).powf(power)).sum();
            *u = 1.0 / denom;
        }
    }

    Ok(membership)
}

/// Weighted means of `data` with weights `U^m`.
///
/// A cluster with zero total weight keeps its `previous` center.
fn update_centers(
    data: ArrayView2<'_, f64>,
    membership: ArrayView2<'_, f64>,
    m: f64,
    previous: Option<ArrayView2<'_, f64>>,
) -> Array2<f64> {
    let weights = membership.mapv(|u| u.powf(m));
    let mut centers = weights.t().dot(&data);
    let totals = weights.sum_axis(Axis(0));

    for (j, mut center) in centers.outer_iter_mut().enumerate() {
        let total = totals[j];
        if total > 0.0 {
            center.mapv_inplace(|x| x / total);
        } else if let Some(prev) = previous {
            center.assign(&prev.row(j));
        }
    }
    centers
}

fn frobenius_distance(a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
