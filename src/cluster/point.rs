//! Package cluster implements place clustering and event segmentation of photos

/// Coordinates closer than this on both axes are the same point
const POINT_EPSILON: f64 = 1e-15;

/// GeoPoint represents a photo coordinate (longitude, latitude)
///
/// The point is stored as [longitude, latitude] where:
/// - `[0]` is longitude
/// - `[1]` is latitude
#[derive(Debug, Clone, Copy)]
pub struct GeoPoint(pub [f64; 2]);

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        GeoPoint([longitude, latitude])
    }

    pub fn x(&self) -> f64 {
        self.0[0]
    }

    pub fn y(&self) -> f64 {
        self.0[1]
    }

    /// Planar (Euclidean) distance in coordinate units
    pub fn dist(&self, b: &GeoPoint) -> f64 {
        use super::distance::planar_distance;
        planar_distance(Some(self), Some(b))
    }

    /// Key usable in hash maps, exact bit equality
    pub fn key(&self) -> (u64, u64) {
        (self.0[0].to_bits(), self.0[1].to_bits())
    }

    /// Centroid of a set of points, `None` when there is nothing to average
    pub fn centroid<'a, I>(points: I) -> Option<GeoPoint>
    where
        I: IntoIterator<Item = &'a GeoPoint>,
    {
        let mut center = GeoPoint([0.0, 0.0]);
        let mut count = 0usize;

        for pt in points {
            for j in 0..2 {
                center.0[j] += pt.0[j];
            }
            count += 1;
        }

        if count == 0 {
            return None;
        }

        for j in 0..2 {
            center.0[j] /= count as f64;
        }

        Some(center)
    }
}

impl PartialEq for GeoPoint {
    fn eq(&self, other: &Self) -> bool {
        (self.0[0] - other.0[0]).abs() < POINT_EPSILON
            && (self.0[1] - other.0[1]).abs() < POINT_EPSILON
    }
}
