#[cfg(test)]
mod tests {
    use crate::cluster::{IntervalThreshold, Photo, PhotoGroup};
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2014, 5, 3)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn photos_at(offsets: &[Duration]) -> Vec<Photo> {
        offsets
            .iter()
            .enumerate()
            .map(|(i, &d)| Photo::new(&format!("http://img/{}.jpg", i), start() + d))
            .collect()
    }

    fn whole(photos: &[Photo]) -> PhotoGroup {
        PhotoGroup::with_members(1, (0..photos.len()).collect())
    }

    const ADAPTIVE: IntervalThreshold = IntervalThreshold::Adaptive {
        min_photos: 4,
        dense_fallback_days: 30,
    };

    #[test]
    fn test_time_span() {
        let photos = photos_at(&[
            Duration::zero(),
            Duration::hours(13) + Duration::minutes(30),
            Duration::days(2),
        ]);
        let group = whole(&photos);

        assert_eq!(group.first_time(&photos), Some(&photos[0].taken_at));
        assert_eq!(group.last_time(&photos), Some(&photos[2].taken_at));
        assert_eq!(group.duration_secs(&photos), Some(2 * 86400));
        // 10:00 May 3rd, 23:30 May 3rd, 10:00 May 5th
        assert_eq!(group.photo_day_count(&photos), 2);
        assert_eq!(group.duration_day_count(&photos), Some(3));
    }

    #[test]
    fn test_empty_group_has_no_span() {
        let photos = photos_at(&[Duration::zero()]);
        let group = PhotoGroup::new(1);
        assert!(group.first_time(&photos).is_none());
        assert!(group.duration_secs(&photos).is_none());
        assert!(group.duration_day_count(&photos).is_none());
        assert!(group.centroid(&photos).is_none());
        assert!(group.split_by_interval(&photos, ADAPTIVE).is_empty());
    }

    #[test]
    fn test_centroid_skips_photos_without_point() {
        let mut photos = photos_at(&[Duration::zero(), Duration::hours(1), Duration::hours(2)]);
        photos[0] = photos[0].clone().with_point(1.0, 1.0);
        photos[2] = photos[2].clone().with_point(3.0, 5.0);

        let center = whole(&photos).centroid(&photos).expect("two geo photos");
        assert_eq!(center.x(), 2.0);
        assert_eq!(center.y(), 3.0);

        let no_geo = PhotoGroup::with_members(2, vec![1]);
        assert!(no_geo.centroid(&photos).is_none());
    }

    #[test]
    fn test_merge_restores_time_order() {
        let photos = photos_at(&[
            Duration::zero(),
            Duration::hours(1),
            Duration::hours(2),
            Duration::hours(3),
        ]);
        let mut a = PhotoGroup::with_members(1, vec![0, 3]);
        let b = PhotoGroup::with_members(2, vec![2, 1]);

        a.merge(&b, &photos);
        assert_eq!(a.members, vec![0, 1, 2, 3]);
        assert_eq!(a.id, 1);
    }

    #[test]
    fn test_split_fixed_interval() {
        let photos = photos_at(&[
            Duration::zero(),
            Duration::minutes(30),
            Duration::minutes(150),
            Duration::minutes(160),
            Duration::minutes(220),
        ]);

        let segments = whole(&photos).split_by_interval(&photos, IntervalThreshold::Fixed(3600));
        // 60 minute gap is "at or under" the threshold
        assert_eq!(segments, vec![vec![0, 1], vec![2, 3, 4]]);
    }

    #[test]
    fn test_split_sorts_members_first() {
        let photos = photos_at(&[Duration::zero(), Duration::hours(5), Duration::minutes(10)]);
        let group = PhotoGroup::with_members(1, vec![1, 2, 0]);

        let segments = group.split_by_interval(&photos, IntervalThreshold::Fixed(3600));
        assert_eq!(segments, vec![vec![0, 2], vec![1]]);
    }

    #[test]
    fn test_adaptive_needs_four_photos() {
        let photos = photos_at(&[Duration::zero(), Duration::days(100), Duration::days(300)]);
        let segments = whole(&photos).split_by_interval(&photos, ADAPTIVE);
        assert_eq!(segments, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_adaptive_uses_fence_of_day_gaps() {
        // Day gaps [0, 0, 40]: q3 = 40 > 1 so the fence (100 days) applies
        let photos = photos_at(&[
            Duration::zero(),
            Duration::hours(2),
            Duration::hours(4),
            Duration::days(40),
        ]);
        let segments = whole(&photos).split_by_interval(&photos, ADAPTIVE);
        assert_eq!(segments, vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn test_adaptive_dense_photos_use_flat_month() {
        // Day gaps [1, 1, 1, 1, 1, 60]: q3 = 1, fall back to 30 days
        let mut offsets: Vec<Duration> = (0..6).map(Duration::days).collect();
        offsets.push(Duration::days(65));
        let photos = photos_at(&offsets);

        let segments = whole(&photos).split_by_interval(&photos, ADAPTIVE);
        assert_eq!(segments, vec![vec![0, 1, 2, 3, 4, 5], vec![6]]);
    }
}
