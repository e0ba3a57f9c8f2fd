//! Cluster validity indices.
//!
//! | Index | Range | Best | Input |
//! |-------|-------|------|-------|
//! | [`central_fuzzy_db`] | [0, ∞) | 0 | one dataset + centers + membership |
//! | [`federated_fuzzy_db`] | [0, ∞) | 0 | local learners sharing centers |
//!
//! Both compute the same fuzzy Davies-Bouldin index; the federated variant
//! only ever sees per-client [`SpreadStatistics`], never raw client data in
//! one place.

mod davies_bouldin;

pub use davies_bouldin::{
    central_fuzzy_db, davies_bouldin_from_spreads, federated_fuzzy_db, SpreadStatistics,
    ValidatedLearner,
};
