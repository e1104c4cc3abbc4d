//! Engine tuning knobs
//!
//! Every empirical constant of the pipeline lives here. The defaults are the
//! values the heuristics were calibrated with on planar longitude/latitude
//! coordinates; datasets in other units need their own file.

use serde::Deserialize;
use std::fs::File;
use std::path::Path;

use crate::error::Result;

pub const MINUTE_IN_SECONDS: i64 = 60;
pub const HOUR_IN_SECONDS: i64 = 60 * MINUTE_IN_SECONDS;
pub const DAY_IN_SECONDS: i64 = 24 * HOUR_IN_SECONDS;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub clustering: ClusteringConfig,
    pub home: HomeConfig,
    pub propagation: PropagationConfig,
    pub segmentation: SegmentationConfig,
    pub event: EventConfig,
}

/// Local (place) clustering parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Minimum neighbourhood size of a core photo
    pub density_threshold: usize,
    /// Neighbourhood radius, `None` derives it from the k-distance Q3
    pub distance_threshold: Option<f64>,
    /// Density ratio gate of the expansion, `0.0` is plain DBSCAN
    pub adaptive_ratio: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            density_threshold: 10,
            distance_threshold: None,
            adaptive_ratio: 0.0,
        }
    }
}

/// Home location inference parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HomeConfig {
    /// Number of local clusters needed before the day-count fence is trusted
    pub min_clusters_for_statistics: usize,
    /// Centroid distance under which two clusters count as the same area.
    /// 0.1 degree is roughly 10 km.
    pub proximity_radius: f64,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            min_clusters_for_statistics: 5,
            proximity_radius: 0.1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PropagationConfig {
    pub address_window_secs: i64,
    pub country_window_secs: i64,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            address_window_secs: 30 * MINUTE_IN_SECONDS,
            country_window_secs: DAY_IN_SECONDS,
        }
    }
}

/// Gaps (in seconds) at which the candidate walk starts a new event
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Two abroad photos closer than this always stay together
    pub abroad_gap_secs: i64,
    /// Split when a home photo is involved
    pub home_gap_secs: i64,
    /// Split inside one non-home local cluster
    pub same_place_gap_secs: i64,
    /// Split everywhere else
    pub default_gap_secs: i64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            abroad_gap_secs: 36 * HOUR_IN_SECONDS,
            home_gap_secs: 3 * HOUR_IN_SECONDS,
            same_place_gap_secs: 36 * HOUR_IN_SECONDS,
            default_gap_secs: 12 * HOUR_IN_SECONDS,
        }
    }
}

/// Event acceptance and presentation split parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    pub min_abroad_photos: usize,
    /// A candidate with more photos than this ...
    pub busy_photo_count: usize,
    /// ... spread over more than this many seconds is an event
    pub busy_duration_secs: i64,
    /// Candidates this small are never events (unless abroad or busy)
    pub max_rejected_photo_count: usize,
    pub min_out_of_city_photos: usize,
    /// Fixed presentation split interval, `None` uses the adaptive rule
    pub segment_interval_secs: Option<i64>,
    pub dense_fallback_days: i64,
    pub min_photos_for_statistics: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            min_abroad_photos: 1,
            busy_photo_count: 10,
            busy_duration_secs: 10 * MINUTE_IN_SECONDS,
            max_rejected_photo_count: 3,
            min_out_of_city_photos: 7,
            segment_interval_secs: Some(HOUR_IN_SECONDS),
            dense_fallback_days: 30,
            min_photos_for_statistics: 4,
        }
    }
}

impl EngineConfig {
    /// Reads a JSON config file; missing sections and fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}
