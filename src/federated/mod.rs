//! Federated fuzzy clustering.
//!
//! Each client keeps its data local. Only derived quantities leave a client:
//! centers, per-cluster support, and the spread statistics consumed by
//! [`federated_fuzzy_db`](crate::validity::federated_fuzzy_db).
//!
//! A typical round:
//!
//! 1. A coordinator distributes common centers ([`ClientLearner::receive_centers`]).
//! 2. Every client refines them on its own data ([`ClientLearner::fit_local`]).
//! 3. The coordinator merges the local centers ([`aggregate_centers`]).
//!
//! Message transport between coordinator and clients is out of scope.

mod aggregate;
mod learner;

pub use aggregate::aggregate_centers;
pub use learner::{ClientLearner, LocalLearner};
