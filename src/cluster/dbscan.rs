use super::distance::DistanceMatrix;
use super::quantile::Quantiles;
use bitvec::prelude::*;

// P-DBSCAN, DBSCAN with an adaptive density gate on expansion:
//
// PDBSCAN(D, eps, MinPts, addt)
//    C = 1
//    for each point P in dataset D, in time order
//       if P is member of a cluster, skip
//       NeighborPts = regionQuery(P, eps)
//       if sizeof(NeighborPts) < MinPts
//          P stays unclustered (may still join later as a border point)
//       else
//          add P to cluster C, density = sizeof(NeighborPts)
//          for each P' taken from the front of NeighborPts
//             if P' is member of a cluster, skip
//             add P' to cluster C
//             NeighborPts' = regionQuery(P', eps)
//             if sizeof(NeighborPts') >= MinPts
//                if addt > 0 and sizeof(NeighborPts') / density < addt, skip
//                density = sizeof(NeighborPts')
//                append NeighborPts' not yet queued nor clustered to NeighborPts
//          C = next cluster
//
// regionQuery(P, eps)
//    return all other points strictly closer than eps to P

/// One cluster found by [`p_db_scan`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DensityCluster {
    /// Cluster ID, starting at 1
    pub c: usize,
    /// Matrix indices of the members, in the order they joined
    pub points: Vec<usize>,
}

/// Clusters matrix points using P-DBSCAN
///
/// # Arguments
///
/// * `matrix` - Pairwise distances of the points to cluster
/// * `eps` - Clustering radius in coordinate units
/// * `min_points` - Minimum number of other points in eps-neighbourhood (density threshold)
/// * `adaptive_ratio` - Minimum ratio of a point's neighbour count to the previous
///   expansion's count; `0.0` disables the gate (plain DBSCAN)
///
/// # Returns
///
/// A tuple `(clusters, noise)` where:
/// - `clusters` is a vector of found clusters
/// - `noise` is a vector of point indices that are outliers (not in any cluster)
pub fn p_db_scan(
    matrix: &DistanceMatrix,
    eps: f64,
    min_points: usize,
    adaptive_ratio: f64,
) -> (Vec<DensityCluster>, Vec<usize>) {
    let mut members = bitvec![0; matrix.len()];
    let mut queued = bitvec![0; matrix.len()];
    let mut clusters = Vec::new();
    let mut c = 1;

    for i in 0..matrix.len() {
        if members[i] {
            continue;
        }

        let neighbor_pts = matrix.neighbors(i, eps);
        if neighbor_pts.len() < min_points {
            continue;
        }

        let mut cluster = DensityCluster { c, points: vec![i] };
        members.set(i, true);
        c += 1;

        queued.fill(false);
        queued.set(i, true);
        for &j in &neighbor_pts {
            queued.set(j, true);
        }

        let mut density = neighbor_pts.len() as f64;
        let mut neighbor_pts = neighbor_pts;
        let mut j = 0;
        // Frontier grows while it is consumed front to back
        while j < neighbor_pts.len() {
            let k = neighbor_pts[j];
            j += 1;
            if members[k] {
                continue;
            }
            cluster.points.push(k);
            members.set(k, true);

            let more_neighbors = matrix.neighbors(k, eps);
            if more_neighbors.len() < min_points {
                continue;
            }
            let count = more_neighbors.len() as f64;
            if adaptive_ratio > 0.0 && count / density < adaptive_ratio {
                continue;
            }
            density = count;

            for &p in &more_neighbors {
                if !queued[p] && !members[p] {
                    neighbor_pts.push(p);
                    queued.set(p, true);
                }
            }
        }

        clusters.push(cluster);
    }

    let noise = members.iter_zeros().collect();
    (clusters, noise)
}

/// Clustering radius from the k-distance distribution: Q3 of the distances
/// of every point to its `k`-th nearest neighbour
///
/// `None` when no point has `k` neighbours.
pub fn auto_eps(matrix: &DistanceMatrix, k: usize) -> Option<f64> {
    Quantiles::from_sample(&matrix.k_distances(k)).map(|q| q.q3)
}
