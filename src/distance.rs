//! Pairwise distances between point sets.
//!
//! [`cdist`] returns the `a × b` matrix of distances between the rows of two
//! matrices sharing the same dimension `D`:
//!
//! | Metric | Distance |
//! |--------|----------|
//! | `Euclidean` | `sqrt(Σ (x - y)²)` |
//! | `SqEuclidean` | `Σ (x - y)²` |
//! | `Minkowski { p }` | `(Σ |x - y|^p)^(1/p)`, `p = ∞` gives Chebyshev |
//! | `SEuclidean` | `sqrt(Σ (x - y)² / V)` with per-dimension variances `V` |
//!
//! ## Public invariants
//!
//! - **No silent shape coercion**: a dimension mismatch is an error.
//! - **Pure**: no state, inputs are never modified.

use crate::error::{Error, Result};
use core::str::FromStr;
use ndarray::{concatenate, Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Distance metric used by [`cdist`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Metric {
    /// Euclidean (L2) distance.
    #[default]
    Euclidean,
    /// Squared Euclidean distance.
    SqEuclidean,
    /// Minkowski distance of order `p` (`p >= 1`).
    Minkowski {
        /// Order of the norm.
        p: f64,
    },
    /// Standardized Euclidean distance.
    SEuclidean {
        /// Per-dimension variances. `None` estimates them (ddof = 1) from
        /// the rows of both inputs stacked together.
        variances: Option<Array1<f64>>,
    },
}

impl Metric {
    /// Canonical metric name.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::SqEuclidean => "sqeuclidean",
            Metric::Minkowski { p } if *p == 1.0 => "cityblock",
            Metric::Minkowski { p } if p.is_infinite() => "chebyshev",
            Metric::Minkowski { .. } => "minkowski",
            Metric::SEuclidean { .. } => "seuclidean",
        }
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "euclidean" => Ok(Metric::Euclidean),
            "sqeuclidean" => Ok(Metric::SqEuclidean),
            "minkowski" => Ok(Metric::Minkowski { p: 2.0 }),
            "cityblock" | "manhattan" => Ok(Metric::Minkowski { p: 1.0 }),
            "chebyshev" => Ok(Metric::Minkowski { p: f64::INFINITY }),
            "seuclidean" => Ok(Metric::SEuclidean { variances: None }),
            _ => Err(Error::UnknownMetric(name.to_string())),
        }
    }
}

/// Squared Euclidean distance between two vectors of equal length.
pub fn sq_euclidean(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Euclidean distance between two vectors of equal length.
pub fn euclidean(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    sq_euclidean(a, b).sqrt()
}

fn minkowski(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>, p: f64) -> f64 {
    if p.is_infinite() {
        return a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max);
    }
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs().powf(p))
        .sum::<f64>()
        .powf(1.0 / p)
}

fn standardized(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>, variances: &Array1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .zip(variances.iter())
        .map(|((x, y), v)| (x - y).powi(2) / v)
        .sum::<f64>()
        .sqrt()
}

fn pooled_variances(a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
    if a.nrows() + b.nrows() < 2 {
        return Err(Error::InvalidParameter {
            name: "seuclidean",
            message: "needs at least two points to estimate variances",
        });
    }
    let stacked = concatenate(Axis(0), &[a.view(), b.view()])
        .map_err(|e| Error::shape(format!("{} columns", a.ncols()), e))?;
    Ok(stacked.var_axis(Axis(0), 1.0))
}

fn fill(
    a: ArrayView2<'_, f64>,
    b: ArrayView2<'_, f64>,
    dist: impl Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>) -> f64,
) -> Array2<f64> {
    let mut out = Array2::zeros((a.nrows(), b.nrows()));
    for (i, x) in a.outer_iter().enumerate() {
        for (j, y) in b.outer_iter().enumerate() {
            out[[i, j]] = dist(x, y);
        }
    }
    out
}

/// Pairwise distances between the rows of `a` (`a × D`) and `b` (`b × D`).
///
/// Returns an `a × b` matrix where entry `[i, j]` is the distance between
/// `a[i]` and `b[j]`.
///
/// # Errors
///
/// - [`Error::ShapeMismatch`] if `a` and `b` have different column counts.
/// - [`Error::InvalidParameter`] for a Minkowski order below 1, or
///   standardized variances that are missing, mis-sized or not positive.
///
/// # Example
///
/// ```rust
/// use fedfuzz::distance::{cdist, Metric};
/// use ndarray::array;
///
/// let a = array![[0.0, 0.0], [3.0, 4.0]];
/// let b = array![[0.0, 0.0]];
/// let d = cdist(a.view(), b.view(), &Metric::Euclidean).unwrap();
/// assert_eq!(d[[1, 0]], 5.0);
/// ```
pub fn cdist(a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>, metric: &Metric) -> Result<Array2<f64>> {
    if a.ncols() != b.ncols() {
        return Err(Error::shape(
            format!("{} columns", a.ncols()),
            format!("{} columns", b.ncols()),
        ));
    }

    match metric {
        Metric::Euclidean => Ok(fill(a, b, euclidean)),
        Metric::SqEuclidean => Ok(fill(a, b, sq_euclidean)),
        Metric::Minkowski { p } => {
            let p = *p;
            // Also rejects NaN.
            if !(p >= 1.0) {
                return Err(Error::InvalidParameter {
                    name: "p",
                    message: "Minkowski order must be >= 1",
                });
            }
            if p == 2.0 {
                return Ok(fill(a, b, euclidean));
            }
            Ok(fill(a, b, |x, y| minkowski(x, y, p)))
        }
        Metric::SEuclidean { variances } => {
            let variances = match variances {
                Some(v) if v.len() != a.ncols() => {
                    return Err(Error::shape(
                        format!("{} variances", a.ncols()),
                        format!("{} variances", v.len()),
                    ));
                }
                Some(v) => v.clone(),
                None => pooled_variances(a, b)?,
            };
            if variances.iter().any(|&v| !(v > 0.0)) {
                return Err(Error::InvalidParameter {
                    name: "variances",
                    message: "must be strictly positive",
                });
            }
            Ok(fill(a, b, |x, y| standardized(x, y, &variances)))
        }
    }
}
