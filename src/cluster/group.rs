use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashSet;

use super::photo::Photo;
use super::point::GeoPoint;
use super::quantile::Quantiles;
use super::time::{calendar_day_diff, time_diff_secs};
use crate::config::DAY_IN_SECONDS;

/// How [`PhotoGroup::split_by_interval`] picks its gap threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntervalThreshold {
    /// Cut wherever consecutive photos are more than this many seconds apart
    Fixed(i64),
    /// Derive the threshold from the day gaps between consecutive photos
    Adaptive {
        /// Fewer photos than this keep the group whole
        min_photos: usize,
        /// Threshold in days when most photos are taken on consecutive days
        dense_fallback_days: i64,
    },
}

/// An ordered bag of photos
///
/// Members are indices into the owner's photo list, the same way a DBSCAN
/// cluster refers to points. Every query takes that list as argument. Queries
/// that talk about "first" or "last" assume the members are time sorted;
/// call [`PhotoGroup::sort_by_time`] after raw pushes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoGroup {
    pub id: usize,
    pub members: Vec<usize>,
}

impl PhotoGroup {
    pub fn new(id: usize) -> Self {
        PhotoGroup {
            id,
            members: Vec::new(),
        }
    }

    pub fn with_members(id: usize, members: Vec<usize>) -> Self {
        PhotoGroup { id, members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn push(&mut self, photo: usize) {
        self.members.push(photo);
    }

    pub fn photos<'a>(&'a self, photos: &'a [Photo]) -> impl Iterator<Item = &'a Photo> + 'a {
        self.members.iter().map(move |&i| &photos[i])
    }

    /// Stable sort by timestamp
    pub fn sort_by_time(&mut self, photos: &[Photo]) {
        self.members.sort_by_key(|&i| photos[i].taken_at);
    }

    /// Appends all members of `other` and restores time order
    #[allow(dead_code)]
    pub fn merge(&mut self, other: &PhotoGroup, photos: &[Photo]) {
        self.members.extend_from_slice(&other.members);
        self.sort_by_time(photos);
    }

    pub fn first_time<'a>(&self, photos: &'a [Photo]) -> Option<&'a NaiveDateTime> {
        self.members.first().map(|&i| &photos[i].taken_at)
    }

    pub fn last_time<'a>(&self, photos: &'a [Photo]) -> Option<&'a NaiveDateTime> {
        self.members.last().map(|&i| &photos[i].taken_at)
    }

    /// Seconds between the first and the last photo
    pub fn duration_secs(&self, photos: &[Photo]) -> Option<i64> {
        time_diff_secs(self.first_time(photos), self.last_time(photos))
    }

    /// Number of distinct calendar dates the photos were taken on
    pub fn photo_day_count(&self, photos: &[Photo]) -> usize {
        self.photos(photos)
            .map(|p| p.taken_at.date())
            .collect::<HashSet<NaiveDate>>()
            .len()
    }

    /// Calendar days spanned, first and last day included
    pub fn duration_day_count(&self, photos: &[Photo]) -> Option<i64> {
        let first = self.first_time(photos)?;
        let last = self.last_time(photos)?;
        Some(calendar_day_diff(first, last) + 1)
    }

    /// Mean coordinate of the geo-tagged members
    pub fn centroid(&self, photos: &[Photo]) -> Option<GeoPoint> {
        GeoPoint::centroid(self.photos(photos).filter_map(|p| p.point.as_ref()))
    }

    /// Splits the members into maximal runs whose consecutive gaps stay at or
    /// under the threshold
    pub fn split_by_interval(
        &self,
        photos: &[Photo],
        threshold: IntervalThreshold,
    ) -> Vec<Vec<usize>> {
        let mut members = self.members.clone();
        members.sort_by_key(|&i| photos[i].taken_at);

        if members.is_empty() {
            return Vec::new();
        }

        let threshold_secs = match threshold {
            IntervalThreshold::Fixed(secs) => secs as f64,
            IntervalThreshold::Adaptive {
                min_photos,
                dense_fallback_days,
            } => adaptive_threshold_secs(&members, photos, min_photos, dense_fallback_days),
        };

        let mut result = Vec::new();
        let mut current = vec![members[0]];
        for pair in members.windows(2) {
            let gap = (photos[pair[1]].taken_at - photos[pair[0]].taken_at).num_seconds();
            if gap as f64 > threshold_secs {
                result.push(std::mem::take(&mut current));
            }
            current.push(pair[1]);
        }
        result.push(current);

        result
    }
}

/// Gap threshold from the Tukey fence of day gaps between consecutive photos
///
/// When Q3 of the day gaps is at most one day the photos are dense and the
/// fence says nothing, so the flat fallback is used instead.
fn adaptive_threshold_secs(
    sorted_members: &[usize],
    photos: &[Photo],
    min_photos: usize,
    dense_fallback_days: i64,
) -> f64 {
    if sorted_members.len() < min_photos.max(2) {
        return f64::INFINITY;
    }

    let day_gaps: Vec<f64> = sorted_members
        .windows(2)
        .map(|pair| calendar_day_diff(&photos[pair[0]].taken_at, &photos[pair[1]].taken_at) as f64)
        .collect();

    match Quantiles::from_sample(&day_gaps) {
        Some(q) if q.q3 > 1.0 => q.upper_fence() * DAY_IN_SECONDS as f64,
        Some(_) => (dense_fallback_days * DAY_IN_SECONDS) as f64,
        None => f64::INFINITY,
    }
}
