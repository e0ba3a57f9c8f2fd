//! Internal cohesion/separation measures and center agreement.
//!
//! | Measure | Best | Meaning |
//! |---------|------|---------|
//! | [`within_cluster_sse`] | low | distance to the assigned center |
//! | [`outside_cluster_sse`] | high | distance to every other center |
//! | [`knowledge_gap`] | low | how far one center set is from another |
//!
//! The SSE variants take hard labels; use
//! [`defuzzify`](crate::cluster::defuzzify) on a membership matrix first.
//! Despite the names, they sum plain Euclidean distances, not squared ones,
//! so scores stay comparable with published benchmark tables.

use crate::distance::{cdist, Metric};
use crate::error::{Error, Result};
use ndarray::ArrayView2;

fn check_labels(data: ArrayView2<'_, f64>, labels: &[usize], k: usize) -> Result<()> {
    if labels.len() != data.nrows() {
        return Err(Error::shape(
            format!("{} labels", data.nrows()),
            format!("{} labels", labels.len()),
        ));
    }
    if labels.iter().any(|&l| l >= k) {
        return Err(Error::InvalidParameter {
            name: "labels",
            message: "label out of range of the centers",
        });
    }
    Ok(())
}

/// Sum of Euclidean (unsquared) distances from each point to its assigned
/// center.
pub fn within_cluster_sse(
    data: ArrayView2<'_, f64>,
    labels: &[usize],
    centers: ArrayView2<'_, f64>,
) -> Result<f64> {
    check_labels(data, labels, centers.nrows())?;
    let dist = cdist(data, centers, &Metric::Euclidean)?;
    Ok(labels
        .iter()
        .enumerate()
        .map(|(i, &l)| dist[[i, l]])
        .sum())
}

/// Sum of Euclidean (unsquared) distances from each point to every center it
/// is **not** assigned to.
pub fn outside_cluster_sse(
    data: ArrayView2<'_, f64>,
    labels: &[usize],
    centers: ArrayView2<'_, f64>,
) -> Result<f64> {
    check_labels(data, labels, centers.nrows())?;
    let dist = cdist(data, centers, &Metric::Euclidean)?;
    Ok(labels
        .iter()
        .enumerate()
        .map(|(i, &l)| dist.row(i).sum() - dist[[i, l]])
        .sum())
}

/// Sum over `centers1` of the distance to the closest center in `centers2`.
///
/// Zero when every center of `centers1` also appears in `centers2`. Not
/// symmetric.
pub fn knowledge_gap(
    centers1: ArrayView2<'_, f64>,
    centers2: ArrayView2<'_, f64>,
    metric: &Metric,
) -> Result<f64> {
    if centers2.nrows() == 0 {
        return Err(Error::EmptyInput);
    }
    let dist = cdist(centers1, centers2, metric)?;
    Ok(dist
        .outer_iter()
        .map(|row| row.iter().copied().fold(f64::INFINITY, f64::min))
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_sse_variants() {
        let data = array![[0.0, 0.0], [0.0, 2.0], [10.0, 0.0]];
        let centers = array![[0.0, 1.0], [10.0, 0.0]];
        let labels = [0, 0, 1];

        // Within: 1 + 1 + 0. Outside: 10 + sqrt(104) + sqrt(101).
        assert_eq!(within_cluster_sse(data.view(), &labels, centers.view()).unwrap(), 2.0);
        let outside = outside_cluster_sse(data.view(), &labels, centers.view()).unwrap();
        assert!((outside - (10.0 + 104f64.sqrt() + 101f64.sqrt())).abs() < 1e-12);
    }

    #[test]
    fn test_sse_is_not_squared() {
        let data = array![[0.0, 0.0], [6.0, 8.0]];
        let centers = array![[3.0, 4.0], [100.0, 100.0]];
        // Both points sit at distance 5 from the first center.
        let within = within_cluster_sse(data.view(), &[0, 0], centers.view()).unwrap();
        assert_eq!(within, 10.0);
    }

    #[test]
    fn test_sse_label_errors() {
        let data = array![[0.0], [1.0]];
        let centers = array![[0.0], [1.0]];
        assert!(matches!(
            within_cluster_sse(data.view(), &[0], centers.view()),
            Err(Error::ShapeMismatch { .. })
        ));
        assert!(matches!(
            outside_cluster_sse(data.view(), &[0, 2], centers.view()),
            Err(Error::InvalidParameter { name: "labels", .. })
        ));
    }

    #[test]
    fn test_knowledge_gap() {
        let truth = array![[0.0, 0.0], [10.0, 10.0]];
        let found = array![[10.0, 10.0], [0.0, 1.0], [50.0, 50.0]];

        let gap = knowledge_gap(truth.view(), found.view(), &Metric::Euclidean).unwrap();
        assert!((gap - 1.0).abs() < 1e-12);

        let same = knowledge_gap(truth.view(), truth.view(), &Metric::Euclidean).unwrap();
        assert_eq!(same, 0.0);
    }

    #[test]
    fn test_knowledge_gap_seuclidean() {
        let a = array![[0.0, 0.0], [2.0, 2.0]];
        let b = array![[0.0, 0.0], [2.0, 4.0]];
        let gap = knowledge_gap(a.view(), b.view(), &"seuclidean".parse::<Metric>().unwrap()).unwrap();
        assert!(gap > 0.0 && gap.is_finite());
    }
}
