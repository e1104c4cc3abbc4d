//! Home location inference
//!
//! Home is where a person takes photos on unusually many different days.
//! With enough places the day counts are screened with a Tukey fence; with
//! few places the most visited one (plus its close neighbours) is home.

use std::collections::BTreeSet;
use tracing::debug;

use super::local::LocalCluster;
use super::photo::Photo;
use super::quantile::upper_fence;
use crate::config::HomeConfig;

/// Which rule produced the home set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeTier {
    /// Day count above the Tukey upper fence
    DayCountFence,
    /// Most photographed days, plus clusters within the proximity radius
    MostVisited,
}

/// Result of one home inference pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeProfile {
    pub tier: Option<HomeTier>,
    pub cluster_ids: BTreeSet<usize>,
    pub countries: BTreeSet<String>,
    /// First address components (city/province level) seen at home
    pub regions: BTreeSet<String>,
}

impl HomeProfile {
    pub fn is_home_cluster(&self, id: usize) -> bool {
        self.cluster_ids.contains(&id)
    }

    /// Photo has a country and it is not one of the home countries
    ///
    /// Without any known home country nothing is abroad.
    pub fn is_abroad(&self, photo: &Photo) -> bool {
        if self.countries.is_empty() {
            return false;
        }
        matches!(&photo.country, Some(c) if !self.countries.contains(c))
    }

    /// Photo has address components whose first level is not a home region
    pub fn is_out_of_home_region(&self, photo: &Photo) -> bool {
        if self.regions.is_empty() {
            return false;
        }
        matches!(photo.region(), Some(r) if !self.regions.contains(r))
    }
}

/// Infers the home clusters and derives home countries and regions from them
///
/// Pure: the `is_home` flags of `clusters` are neither read nor written.
pub fn infer_home(clusters: &[LocalCluster], photos: &[Photo], config: &HomeConfig) -> HomeProfile {
    let mut profile = HomeProfile::default();
    if clusters.is_empty() {
        return profile;
    }

    let day_counts: Vec<usize> = clusters
        .iter()
        .map(|c| c.group.photo_day_count(photos))
        .collect();

    if clusters.len() >= config.min_clusters_for_statistics {
        let sample: Vec<f64> = day_counts.iter().map(|&d| d as f64).collect();
        if let Some(fence) = upper_fence(&sample) {
            debug!(fence, "home day-count fence");
            for (cluster, &days) in clusters.iter().zip(&day_counts) {
                if days as f64 > fence {
                    profile.cluster_ids.insert(cluster.id());
                }
            }
        }
        if !profile.cluster_ids.is_empty() {
            profile.tier = Some(HomeTier::DayCountFence);
        }
    }

    if profile.tier.is_none() {
        // Earliest cluster wins a tie on the maximum
        let mut best = 0;
        for (i, &days) in day_counts.iter().enumerate() {
            if days > day_counts[best] {
                best = i;
            }
        }

        let home = &clusters[best];
        profile.cluster_ids.insert(home.id());
        if let Some(center) = home.group.centroid(photos) {
            for cluster in clusters {
                if cluster.id() == home.id() {
                    continue;
                }
                let close = cluster
                    .group
                    .centroid(photos)
                    .is_some_and(|c| c.dist(&center) < config.proximity_radius);
                if close {
                    profile.cluster_ids.insert(cluster.id());
                }
            }
        }
        profile.tier = Some(HomeTier::MostVisited);
    }

    for cluster in clusters.iter().filter(|c| profile.cluster_ids.contains(&c.id())) {
        for photo in cluster.group.photos(photos) {
            if let Some(country) = &photo.country {
                profile.countries.insert(country.clone());
            }
            if let Some(region) = photo.region() {
                profile.regions.insert(region.to_string());
            }
        }
    }

    profile
}

/// A cluster is close to home if it is home or its centroid lies within the
/// proximity radius of a home cluster's centroid
pub fn is_close_to_home(
    cluster: &LocalCluster,
    clusters: &[LocalCluster],
    photos: &[Photo],
    proximity_radius: f64,
) -> bool {
    if cluster.is_home {
        return true;
    }
    let Some(center) = cluster.group.centroid(photos) else {
        return false;
    };

    clusters.iter().filter(|c| c.is_home).any(|home| {
        home.group
            .centroid(photos)
            .is_some_and(|c| c.dist(&center) < proximity_radius)
    })
}
