//! One person's photos and the event finding pipeline over them
//!
//! Stages must run in order: [`Person::cluster_locations`], optionally
//! [`Person::apply_location_lookup`], [`Person::recompute_home`],
//! [`Person::propagate_location_info`] (forward and reverse), then
//! [`Person::find_events`]. [`Person::run`] does all of it.

use tracing::{debug, info};

use crate::cluster::{
    DistanceMatrix, EventCluster, EventPolicy, GeoPoint, HomeProfile, LocalCluster, Photo,
    PhotoGroup, auto_eps, infer_home, is_close_to_home, p_db_scan, time_diff_secs,
};
use crate::config::{
    ClusteringConfig, EngineConfig, EventConfig, HomeConfig, PropagationConfig, SegmentationConfig,
};
use crate::lookup::{ApproxLocation, LocationLookup};

/// What happened when local clustering was attempted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClusteringOutcome {
    /// At least one local cluster was found
    Clustered { clusters: usize, eps: f64 },
    /// Enough data, but no photo was dense enough to seed a cluster
    NoClusters { eps: f64 },
    /// Not enough geo-tagged photos for the density threshold
    Insufficient { geo_photos: usize, required: usize },
}

/// Pairwise distances over the geo-tagged photos, with the photo index of
/// every matrix row
#[derive(Debug, Clone)]
struct GeoMatrix {
    photo_ids: Vec<usize>,
    matrix: DistanceMatrix,
}

#[derive(Debug, Clone)]
pub struct Person {
    name: String,
    /// Kept time sorted on insertion
    photos: Vec<Photo>,
    geo_matrix: Option<GeoMatrix>,
    local_clusters: Vec<LocalCluster>,
    /// Local cluster id of every photo, by photo index
    assignments: Vec<Option<usize>>,
    home: HomeProfile,
    candidates: Vec<EventCluster>,
    events: Vec<EventCluster>,
    lookup_calls: usize,
}

impl Person {
    pub fn new(name: &str) -> Self {
        Person {
            name: name.to_string(),
            photos: Vec::new(),
            geo_matrix: None,
            local_clusters: Vec::new(),
            assignments: Vec::new(),
            home: HomeProfile::default(),
            candidates: Vec::new(),
            events: Vec::new(),
            lookup_calls: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn image_count(&self) -> usize {
        self.photos.len()
    }

    pub fn geo_image_count(&self) -> usize {
        self.photos.iter().filter(|p| p.has_point()).count()
    }

    pub fn local_clusters(&self) -> &[LocalCluster] {
        &self.local_clusters
    }

    pub fn home(&self) -> &HomeProfile {
        &self.home
    }

    pub fn candidates(&self) -> &[EventCluster] {
        &self.candidates
    }

    pub fn events(&self) -> &[EventCluster] {
        &self.events
    }

    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls
    }

    /// Inserts a photo after every photo taken at the same time or earlier
    ///
    /// The photo set changed, so every derived result is dropped.
    pub fn add_photo(&mut self, photo: Photo) {
        let at = match self.photos.last() {
            Some(last) if last.taken_at <= photo.taken_at => self.photos.len(),
            _ => self
                .photos
                .partition_point(|p| p.taken_at <= photo.taken_at),
        };
        self.photos.insert(at, photo);
        self.reset_derived();
    }

    fn reset_derived(&mut self) {
        self.geo_matrix = None;
        self.clear_clustering();
    }

    /// Drops clusters, home and events; the assignment table is left empty
    /// until the next clustering pass sizes it
    fn clear_clustering(&mut self) {
        self.local_clusters.clear();
        self.assignments.clear();
        self.home = HomeProfile::default();
        self.candidates.clear();
        self.events.clear();
    }

    fn geo_matrix(&mut self) -> &GeoMatrix {
        let photos = &self.photos;
        self.geo_matrix.get_or_insert_with(|| {
            let (photo_ids, points): (Vec<usize>, Vec<GeoPoint>) = photos
                .iter()
                .enumerate()
                .filter_map(|(i, p)| p.point.map(|pt| (i, pt)))
                .unzip();
            debug!(points = points.len(), "building distance matrix");
            GeoMatrix {
                photo_ids,
                matrix: DistanceMatrix::new(&points),
            }
        })
    }

    /// Local cluster id of a photo
    pub fn cluster_of(&self, photo: usize) -> Option<usize> {
        self.assignments.get(photo).copied().flatten()
    }

    fn cluster_by_id(&self, id: usize) -> Option<&LocalCluster> {
        self.local_clusters.get(id.checked_sub(1)?)
    }

    fn cluster_by_id_mut(&mut self, id: usize) -> Option<&mut LocalCluster> {
        self.local_clusters.get_mut(id.checked_sub(1)?)
    }

    /// Photo belongs to a home local cluster
    pub fn is_in_home(&self, photo: usize) -> bool {
        self.cluster_of(photo)
            .and_then(|id| self.cluster_by_id(id))
            .is_some_and(|c| c.is_home)
    }

    pub fn is_abroad(&self, photo: usize) -> bool {
        self.home.is_abroad(&self.photos[photo])
    }

    pub fn is_close_to_home(&self, cluster: &LocalCluster, config: &HomeConfig) -> bool {
        is_close_to_home(
            cluster,
            &self.local_clusters,
            &self.photos,
            config.proximity_radius,
        )
    }

    /// Groups geo-tagged photos into local clusters with P-DBSCAN
    ///
    /// Any previous clustering, home inference and event result is discarded.
    pub fn cluster_locations(&mut self, config: &ClusteringConfig) -> ClusteringOutcome {
        let geo_photos = self.geo_image_count();
        let min_points = config.density_threshold;
        self.clear_clustering();
        self.assignments.resize(self.photos.len(), None);

        if geo_photos <= min_points {
            debug!(person = %self.name, geo_photos, min_points, "too few geo-tagged photos to cluster");
            return ClusteringOutcome::Insufficient {
                geo_photos,
                required: min_points + 1,
            };
        }

        let geo = self.geo_matrix();
        let eps = match config.distance_threshold {
            Some(eps) if eps > 0.0 => eps,
            _ => match auto_eps(&geo.matrix, min_points) {
                Some(eps) => eps,
                None => {
                    return ClusteringOutcome::Insufficient {
                        geo_photos,
                        required: min_points + 1,
                    };
                }
            },
        };
        debug!(eps, min_points, adaptive_ratio = config.adaptive_ratio, "running P-DBSCAN");

        let (found, noise) = p_db_scan(&geo.matrix, eps, min_points, config.adaptive_ratio);
        // Matrix rows back to photo indices
        let clusters: Vec<(usize, Vec<usize>)> = found
            .into_iter()
            .map(|c| (c.c, c.points.iter().map(|&k| geo.photo_ids[k]).collect()))
            .collect();
        let noise = noise.len();

        for (id, members) in clusters {
            for &photo in &members {
                self.assignments[photo] = Some(id);
            }
            let mut group = PhotoGroup::with_members(id, members);
            group.sort_by_time(&self.photos);
            self.local_clusters.push(LocalCluster::new(group));
        }

        info!(
            person = %self.name,
            clusters = self.local_clusters.len(),
            noise,
            eps,
            "local clustering done"
        );

        if self.local_clusters.is_empty() {
            ClusteringOutcome::NoClusters { eps }
        } else {
            ClusteringOutcome::Clustered {
                clusters: self.local_clusters.len(),
                eps,
            }
        }
    }

    /// Re-derives home clusters, countries and regions from the current local
    /// clusters and flags the home clusters
    pub fn recompute_home(&mut self, config: &HomeConfig) -> &HomeProfile {
        self.home = infer_home(&self.local_clusters, &self.photos, config);
        for cluster in &mut self.local_clusters {
            cluster.is_home = self.home.is_home_cluster(cluster.id());
        }
        debug!(
            person = %self.name,
            tier = ?self.home.tier,
            homes = ?self.home.cluster_ids,
            countries = ?self.home.countries,
            regions = ?self.home.regions,
            "home inferred"
        );
        &self.home
    }

    /// Drops address and country data from every photo
    pub fn clear_location_info(&mut self) {
        for photo in &mut self.photos {
            photo.clear_location_info();
        }
    }

    /// Looks up the photo nearest each local cluster's centroid and spreads
    /// the answer over the cluster's photos that lack location data
    ///
    /// Returns the number of lookups performed, which is also added to
    /// [`Person::lookup_calls`].
    pub fn apply_location_lookup(&mut self, lookup: &dyn LocationLookup) -> usize {
        let mut calls = 0;

        for cluster in &self.local_clusters {
            let Some(center_photo) = cluster.photo_for_lookup(&self.photos) else {
                continue;
            };
            let Some(point) = self.photos[center_photo].point else {
                continue;
            };

            calls += 1;
            match lookup.lookup(&point) {
                Some(location) => cluster.apply_approximate_location(&mut self.photos, &location),
                None => debug!(cluster = cluster.id(), ?point, "no lookup entry"),
            }
        }

        self.lookup_calls += calls;
        calls
    }

    /// Lookup rows for every local cluster whose centre photo carries an
    /// address, in the format a lookup table is built from
    pub fn representative_locations(&self) -> Vec<(GeoPoint, ApproxLocation)> {
        self.local_clusters
            .iter()
            .filter_map(|cluster| {
                let photo = &self.photos[cluster.photo_for_lookup(&self.photos)?];
                let ac = photo.address_components.as_ref()?;
                Some((
                    photo.point?,
                    ApproxLocation {
                        first: ac.first().to_string(),
                        second: ac.second().to_string(),
                        country: photo.country.clone().unwrap_or_default(),
                    },
                ))
            })
            .collect()
    }

    /// Copies location data from clustered photos to the unclustered photos
    /// taken right after them (right before them when `reverse`)
    ///
    /// Within the address window the follower gets the address and joins the
    /// leader's local cluster; within the country window it gets the country.
    /// Photos only ever move from unclustered to clustered.
    pub fn propagate_location_info(&mut self, reverse: bool, config: &PropagationConfig) {
        if self.photos.len() <= 1 || self.local_clusters.is_empty() {
            return;
        }

        let order: Vec<usize> = if reverse {
            (0..self.photos.len()).rev().collect()
        } else {
            (0..self.photos.len()).collect()
        };

        let mut joined = Vec::new();
        for pair in order.windows(2) {
            let (prev, curr) = (pair[0], pair[1]);
            let Some(gap) = time_diff_secs(
                Some(&self.photos[prev].taken_at),
                Some(&self.photos[curr].taken_at),
            ) else {
                continue;
            };

            if let (Some(id), None) = (self.assignments[prev], self.assignments[curr]) {
                if gap < config.address_window_secs {
                    let (formatted, components) = {
                        let p = &self.photos[prev];
                        (p.formatted_address.clone(), p.address_components.clone())
                    };
                    let c = &mut self.photos[curr];
                    if formatted.is_some() {
                        c.formatted_address = formatted;
                    }
                    if components.is_some() {
                        c.address_components = components;
                    }

                    self.assignments[curr] = Some(id);
                    if let Some(cluster) = self.cluster_by_id_mut(id) {
                        cluster.group.push(curr);
                    }
                    joined.push(id);
                }
            }

            if self.photos[curr].country.is_none() && gap < config.country_window_secs {
                if let Some(country) = self.photos[prev].country.clone() {
                    self.photos[curr].country = Some(country);
                }
            }
        }

        joined.sort_unstable();
        joined.dedup();
        for id in joined {
            if let Some(idx) = id.checked_sub(1) {
                if let Some(cluster) = self.local_clusters.get_mut(idx) {
                    cluster.group.sort_by_time(&self.photos);
                }
            }
        }
    }

    /// Whether a new event candidate starts between two consecutive photos
    ///
    /// 1. both abroad and close in time: keep together
    /// 2. a home photo involved and a few hours apart: split
    /// 3. no home photo: split after a long gap inside the same place,
    ///    after a medium gap otherwise
    /// 4. split after a medium gap
    pub fn split_here(&self, prev: usize, curr: usize, config: &SegmentationConfig) -> bool {
        let Some(gap) = time_diff_secs(
            Some(&self.photos[prev].taken_at),
            Some(&self.photos[curr].taken_at),
        ) else {
            return false;
        };

        if self.is_abroad(prev) && self.is_abroad(curr) && gap < config.abroad_gap_secs {
            return false;
        }

        let prev_home = self.is_in_home(prev);
        let curr_home = self.is_in_home(curr);
        if (prev_home || curr_home) && gap >= config.home_gap_secs {
            return true;
        }

        if !prev_home && !curr_home {
            return match (self.cluster_of(prev), self.cluster_of(curr)) {
                (Some(a), Some(b)) if a == b => gap >= config.same_place_gap_secs,
                _ => gap >= config.default_gap_secs,
            };
        }

        gap >= config.default_gap_secs
    }

    /// Walks the photos in time order and cuts them into event candidates
    pub fn segment_events(&mut self, config: &SegmentationConfig) -> &[EventCluster] {
        let mut candidates: Vec<EventCluster> = Vec::new();
        let mut current = PhotoGroup::new(1);

        for curr in 0..self.photos.len() {
            if curr > 0 && self.split_here(curr - 1, curr, config) {
                let next = PhotoGroup::new(current.id + 1);
                candidates.push(EventCluster::new(std::mem::replace(&mut current, next)));
            }
            current.push(curr);
        }
        if !current.is_empty() {
            candidates.push(EventCluster::new(current));
        }

        self.candidates = candidates;
        &self.candidates
    }

    pub fn event_policy<'a>(&'a self, config: &'a EventConfig) -> EventPolicy<'a> {
        EventPolicy {
            home: &self.home,
            config,
        }
    }

    /// Rebuilds the candidates and keeps the ones that are events
    pub fn find_events(&mut self, config: &EngineConfig) -> &[EventCluster] {
        self.segment_events(&config.segmentation);

        let policy = self.event_policy(&config.event);
        let events: Vec<EventCluster> = self
            .candidates
            .iter()
            .filter(|c| policy.is_event(c, &self.photos))
            .cloned()
            .collect();

        info!(
            person = %self.name,
            candidates = self.candidates.len(),
            events = events.len(),
            "events found"
        );
        self.events = events;
        &self.events
    }

    pub fn is_accepted(&self, candidate: &EventCluster) -> bool {
        self.events.iter().any(|e| e.id() == candidate.id())
    }

    /// Full pipeline
    ///
    /// With a lookup, photo address data is replaced by one lookup per local
    /// cluster before home inference. Unavailable clustering is not an error:
    /// segmentation then runs with no home context.
    pub fn run(
        &mut self,
        config: &EngineConfig,
        lookup: Option<&dyn LocationLookup>,
    ) -> ClusteringOutcome {
        let outcome = self.cluster_locations(&config.clustering);

        if let Some(lookup) = lookup {
            self.clear_location_info();
            let calls = self.apply_location_lookup(lookup);
            debug!(person = %self.name, calls, "location lookups");
        }

        if matches!(outcome, ClusteringOutcome::Clustered { .. }) {
            self.recompute_home(&config.home);
        }

        self.propagate_location_info(false, &config.propagation);
        self.propagate_location_info(true, &config.propagation);

        self.find_events(config);
        outcome
    }
}
