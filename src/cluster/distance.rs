use super::point::GeoPoint;

/// Calculates planar (Euclidean) distance between two optional points
///
/// # Returns
///
/// Distance in coordinate units, or NaN if either point is missing. NaN never
/// compares below a threshold, so callers treat it as "infinitely far".
pub fn planar_distance(p1: Option<&GeoPoint>, p2: Option<&GeoPoint>) -> f64 {
    match (p1, p2) {
        (Some(p1), Some(p2)) => {
            let v1 = p1.0[0] - p2.0[0];
            let v2 = p1.0[1] - p2.0[1];
            (v1 * v1 + v2 * v2).sqrt()
        }
        _ => f64::NAN,
    }
}

/// Symmetric pairwise distance matrix over a fixed list of points
///
/// Row `i` belongs to the `i`-th point given to [`DistanceMatrix::new`]. The
/// matrix is built once and must be rebuilt if the point list changes.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    size: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    pub fn new(points: &[GeoPoint]) -> Self {
        let size = points.len();
        let mut values = vec![0.0; size * size];

        // Only the upper triangle is computed, the lower one is mirrored
        for i in 0..size {
            for j in (i + 1)..size {
                let d = points[i].dist(&points[j]);
                values[i * size + j] = d;
                values[j * size + i] = d;
            }
        }

        DistanceMatrix { size, values }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[cfg(test)]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }

    /// Indices of all points strictly closer than `threshold` to point `i`,
    /// excluding `i` itself
    pub fn neighbors(&self, i: usize, threshold: f64) -> Vec<usize> {
        self.row(i)
            .iter()
            .enumerate()
            .filter(|&(j, &d)| j != i && d < threshold)
            .map(|(j, _)| j)
            .collect()
    }

    /// Distance from every point to its `k`-th nearest neighbour
    ///
    /// Returns an empty list when there are not more than `k` points, since
    /// the `k`-th neighbour does not exist then.
    pub fn k_distances(&self, k: usize) -> Vec<f64> {
        if k >= self.size {
            return Vec::new();
        }

        let mut result = Vec::with_capacity(self.size);
        let mut row = Vec::with_capacity(self.size);
        for i in 0..self.size {
            row.clear();
            row.extend(self.row(i).iter().copied().filter(|d| !d.is_nan()));
            if row.len() <= k {
                continue;
            }
            // row[0] is the point itself at distance 0
            row.sort_by(f64::total_cmp);
            result.push(row[k]);
        }

        result
    }
}
