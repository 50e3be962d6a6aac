use crate::gklib::{Dataset, KMeansResult, KmError, Partition, Point, Result};
use itertools::Itertools;
use serde::Serialize;

/// Computes the mean distance between every point and the center of its cluster.
///
/// # Parameters
/// - `data`: The points that were clustered.
/// - `centers`: Cluster centers, indexed the same as the groups of `clusters`.
/// - `clusters`: Dataset indices grouped by center.
///
/// # Returns
/// The average point-to-own-center distance. Lower means more compact clusters.
///
/// # Errors
/// `KmError::EmptyDataset` when the partition holds no points.
pub fn intra_cluster(data: &Dataset, centers: &[Point], clusters: &Partition) -> Result<f64> {
    if clusters.len() != centers.len() {
        return Err(KmError::PartitionMismatch {
            groups: clusters.len(),
            centers: centers.len(),
        });
    }
    let points = data.points();
    let mut total_dist = 0.0;
    let mut total_points = 0;
    for (center, group) in centers.iter().zip(clusters.groups()) {
        for &idx in group {
            total_dist += center.distance(&points[idx]);
            total_points += 1;
        }
    }
    if total_points == 0 {
        return Err(KmError::EmptyDataset);
    }
    Ok(total_dist / total_points as f64)
}

/// Computes the mean distance over all unordered pairs of distinct centers.
///
/// # Parameters
/// - `centers`: Cluster centers.
///
/// # Returns
/// The average center-to-center distance. Higher means better separated clusters.
///
/// # Errors
/// `KmError::TooFewCenters` when there are fewer than two centers.
pub fn inter_cluster(centers: &[Point]) -> Result<f64> {
    if centers.len() < 2 {
        return Err(KmError::TooFewCenters { k: centers.len() });
    }
    let (total_dist, pairs) = centers
        .iter()
        .tuple_combinations()
        .fold((0.0, 0usize), |(sum, n), (a, b)| (sum + a.distance(b), n + 1));
    Ok(total_dist / pairs as f64)
}

/// Ratio of inter- to intra-cluster distance
pub fn separability(inter: f64, intra: f64) -> Result<f64> {
    if intra == 0.0 {
        return Err(KmError::ZeroIntra);
    }
    Ok(inter / intra)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub intra: f64,
    pub inter: f64,
    pub score: f64,
}

impl Evaluation {
    pub fn compute(data: &Dataset, result: &KMeansResult) -> Result<Self> {
        let intra = intra_cluster(data, &result.centers, &result.clusters)?;
        let inter = inter_cluster(&result.centers)?;
        let score = separability(inter, intra)?;
        Ok(Self {
            intra,
            inter,
            score,
        })
    }
}
