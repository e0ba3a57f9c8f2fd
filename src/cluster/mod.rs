//! Fuzzy clustering.
//!
//! ## Hard vs Soft Clustering
//!
//! **Hard clustering** assigns each point to exactly one cluster.
//!
//! **Soft (fuzzy) clustering** gives each point a membership in every
//! cluster; memberships lie in [0, 1] and sum to 1 per point. A point halfway
//! between two dense groups gets roughly 0.5 in each instead of being forced
//! into one of them. [`defuzzify`] recovers hard labels by arg-max.
//!
//! ## Fuzzy C-Means
//!
//! Alternates between weighted center updates and membership updates until
//! the membership matrix stops changing. See [`FuzzyCMeans`].
//!
//! ## Usage
//!
//! ```rust
//! use fedfuzz::cluster::{FcmConfig, FuzzyCMeans, Initialization};
//! use ndarray::array;
//!
//! let data = array![[0.0, 0.0], [0.1, 0.1], [10.0, 10.0], [10.1, 10.1]];
//!
//! let mut fcm = FuzzyCMeans::new(FcmConfig::new(2).with_seed(42)).unwrap();
//! fcm.fit(data.view(), Initialization::RandomMembership).unwrap();
//!
//! let u = fcm.membership().unwrap();
//! // u[[i, k]] = membership of point i in cluster k
//! assert!((u.row(0).sum() - 1.0).abs() < 1e-9);
//! ```

mod fcm;
mod traits;

pub use fcm::{
    FcmConfig, FcmState, FitSummary, FuzzyCMeans, Initialization, RANDOM_CENTER_RANGE,
};
pub use traits::{defuzzify, Clustering, SoftClustering};

#[cfg(test)]
pub(crate) use fcm::membership_matrix;
