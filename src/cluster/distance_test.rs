#[cfg(test)]
mod tests {
    use crate::cluster::{DistanceMatrix, GeoPoint, planar_distance};
    use quickcheck::{TestResult, quickcheck};

    #[test]
    fn test_planar_distance() {
        let p1 = GeoPoint::new(0.0, 0.0);
        let p2 = GeoPoint::new(3.0, 4.0);
        assert_eq!(planar_distance(Some(&p1), Some(&p2)), 5.0);
        assert_eq!(planar_distance(Some(&p2), Some(&p1)), 5.0);
        assert_eq!(planar_distance(Some(&p1), Some(&p1)), 0.0);
        assert_eq!(p1.dist(&p2), 5.0);
    }

    #[test]
    fn test_planar_distance_missing_point() {
        let p = GeoPoint::new(127.0, 37.5);
        assert!(planar_distance(Some(&p), None).is_nan());
        assert!(planar_distance(None, Some(&p)).is_nan());
        assert!(planar_distance(None, None).is_nan());
        // NaN must never look close
        assert!(!(planar_distance(Some(&p), None) < 1.0));
    }

    #[test]
    fn test_neighbors_exclude_self_and_boundary() {
        let points = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.5, 0.0),
            GeoPoint::new(1.0, 0.0),
            GeoPoint::new(3.0, 0.0),
        ];
        let matrix = DistanceMatrix::new(&points);

        assert_eq!(matrix.neighbors(0, 1.0), vec![1]);
        assert_eq!(matrix.neighbors(1, 1.0), vec![0, 2]);
        assert_eq!(matrix.neighbors(3, 1.0), Vec::<usize>::new());
    }

    #[test]
    fn test_k_distances() {
        let points: Vec<GeoPoint> = (0..4).map(|i| GeoPoint::new(i as f64, 0.0)).collect();
        let matrix = DistanceMatrix::new(&points);

        assert_eq!(matrix.k_distances(1), vec![1.0, 1.0, 1.0, 1.0]);
        assert_eq!(matrix.k_distances(2), vec![2.0, 1.0, 1.0, 2.0]);
        assert!(matrix.k_distances(4).is_empty());
    }

    #[test]
    fn prop_matrix_symmetric_zero_diagonal() {
        fn prop(coords: Vec<(f64, f64)>) -> TestResult {
            if coords.len() > 30
                || coords
                    .iter()
                    .any(|(x, y)| !x.is_finite() || !y.is_finite() || x.abs() > 1e6 || y.abs() > 1e6)
            {
                return TestResult::discard();
            }

            let points: Vec<GeoPoint> = coords.iter().map(|&(x, y)| GeoPoint::new(x, y)).collect();
            let matrix = DistanceMatrix::new(&points);

            for i in 0..matrix.len() {
                if matrix.get(i, i) != 0.0 {
                    return TestResult::failed();
                }
                for j in 0..matrix.len() {
                    if matrix.get(i, j) != matrix.get(j, i) {
                        return TestResult::failed();
                    }
                }
            }
            TestResult::passed()
        }
        quickcheck(prop as fn(Vec<(f64, f64)>) -> TestResult);
    }
}
