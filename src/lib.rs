//! # fedfuzz
//!
//! Fuzzy C-Means clustering and a federated Davies-Bouldin validity index.
//!
//! Data flows one way: a data matrix goes through [`FuzzyCMeans::fit`] to
//! produce centers and a membership matrix, and a validator turns those into
//! one score. In the federated setting every client keeps its data; only
//! centers, per-cluster support and spread statistics are combined.
//!
//! ```rust
//! use fedfuzz::{central_fuzzy_db, FcmConfig, FuzzyCMeans, Initialization};
//! use ndarray::array;
//!
//! let data = array![[0.0, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]];
//!
//! let mut fcm = FuzzyCMeans::new(FcmConfig::new(2)).unwrap();
//! fcm.set_centers(array![[1.0, 0.0], [9.0, 1.0]]).unwrap();
//! fcm.fit(data.view(), Initialization::Federated).unwrap();
//!
//! let db = central_fuzzy_db(
//!     data.view(),
//!     fcm.centers().unwrap().view(),
//!     fcm.membership().unwrap().view(),
//!     2,
//! )
//! .unwrap();
//! assert!(db < 1.0);
//! ```

pub mod cluster;
pub mod dataset;
pub mod distance;
/// Error types used across `fedfuzz`.
pub mod error;
pub mod federated;
pub mod measures;
pub mod validity;

#[cfg(test)]
mod federation_tests;

pub use cluster::{
    defuzzify, Clustering, FcmConfig, FcmState, FitSummary, FuzzyCMeans, Initialization,
    SoftClustering,
};
pub use distance::{cdist, Metric};
pub use error::{Error, Result};
pub use federated::{aggregate_centers, ClientLearner, LocalLearner};
pub use measures::{knowledge_gap, outside_cluster_sse, within_cluster_sse};
pub use validity::{central_fuzzy_db, federated_fuzzy_db, SpreadStatistics, ValidatedLearner};
