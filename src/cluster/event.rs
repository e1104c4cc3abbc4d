use std::fmt;

use super::group::{IntervalThreshold, PhotoGroup};
use super::home::HomeProfile;
use super::photo::Photo;
use super::time::{DATE_LABEL_FORMAT, is_same_day};
use crate::config::EventConfig;

/// A run of photos that may form an event (trip, outing, gathering)
#[derive(Debug, Clone, PartialEq)]
pub struct EventCluster {
    pub group: PhotoGroup,
}

/// Most frequent place label of an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepresentativeLocation {
    pub label: String,
    /// Number of distinct labels seen in the event
    pub distinct: usize,
}

impl fmt::Display for RepresentativeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.distinct == 1 {
            write!(f, "at {}", self.label)
        } else {
            write!(f, "around {} and elsewhere", self.label)
        }
    }
}

/// Event acceptance rules, attached to a person's home context
#[derive(Debug, Clone, Copy)]
pub struct EventPolicy<'a> {
    pub home: &'a HomeProfile,
    pub config: &'a EventConfig,
}

impl EventPolicy<'_> {
    /// Decides whether a candidate is an event, first matching rule wins:
    ///
    /// 1. any photo abroad: event
    /// 2. many photos over more than a few minutes: event
    /// 3. only a handful of photos: not an event
    /// 4. every photo outside the home region, and enough of them: event
    /// 5. otherwise not an event
    pub fn is_event(&self, event: &EventCluster, photos: &[Photo]) -> bool {
        let cfg = self.config;
        let total = event.group.len();
        let mut abroad = 0;
        let mut out_of_region = 0;

        for photo in event.group.photos(photos) {
            if self.home.is_abroad(photo) {
                abroad += 1;
            }
            if self.home.is_out_of_home_region(photo) {
                out_of_region += 1;
            }
        }
        let duration = event.group.duration_secs(photos).unwrap_or(0);

        if abroad >= cfg.min_abroad_photos {
            return true;
        }
        if total > cfg.busy_photo_count && duration > cfg.busy_duration_secs {
            return true;
        }
        if total <= cfg.max_rejected_photo_count {
            return false;
        }
        total == out_of_region && total >= cfg.min_out_of_city_photos
    }
}

impl EventCluster {
    pub fn new(group: PhotoGroup) -> Self {
        EventCluster { group }
    }

    pub fn id(&self) -> usize {
        self.group.id
    }

    /// Most frequent place label: the country for photos abroad, the first two
    /// address components otherwise
    ///
    /// Photos with neither contribute nothing. On equal counts the label seen
    /// first wins. `None` when no photo has a label.
    pub fn representative_location(
        &self,
        photos: &[Photo],
        home: &HomeProfile,
    ) -> Option<RepresentativeLocation> {
        // Insertion ordered tally, events are small
        let mut tally: Vec<(String, usize)> = Vec::new();

        for photo in self.group.photos(photos) {
            let label = if home.is_abroad(photo) {
                photo.country.clone()
            } else {
                photo.address_components.as_ref().map(|ac| ac.region_label())
            };
            let Some(label) = label else {
                continue;
            };

            match tally.iter_mut().find(|(l, _)| *l == label) {
                Some((_, count)) => *count += 1,
                None => tally.push((label, 1)),
            }
        }

        let mut best: Option<&(String, usize)> = None;
        for entry in &tally {
            if best.is_none_or(|b| entry.1 > b.1) {
                best = Some(entry);
            }
        }

        best.map(|(label, _)| RepresentativeLocation {
            label: label.clone(),
            distinct: tally.len(),
        })
    }

    /// "on 2014/05/03" for a single day, "from 2014/05/03 to 2014/05/10" otherwise
    pub fn range_label(&self, photos: &[Photo]) -> String {
        let (Some(first), Some(last)) = (self.group.first_time(photos), self.group.last_time(photos))
        else {
            return String::new();
        };

        let from = first.format(DATE_LABEL_FORMAT);
        if is_same_day(first, last) {
            format!("on {}", from)
        } else {
            format!("from {} to {}", from, last.format(DATE_LABEL_FORMAT))
        }
    }

    /// Splits the event into visits for presentation, numbered from 1
    pub fn segments(&self, photos: &[Photo], config: &EventConfig) -> Vec<EventCluster> {
        let threshold = match config.segment_interval_secs {
            Some(secs) => IntervalThreshold::Fixed(secs),
            None => IntervalThreshold::Adaptive {
                min_photos: config.min_photos_for_statistics,
                dense_fallback_days: config.dense_fallback_days,
            },
        };

        self.group
            .split_by_interval(photos, threshold)
            .into_iter()
            .enumerate()
            .map(|(i, members)| EventCluster::new(PhotoGroup::with_members(i + 1, members)))
            .collect()
    }
}
