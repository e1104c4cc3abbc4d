//! Package cluster implements place clustering (P-DBSCAN over a distance
//! matrix) and event segmentation building blocks for photos
pub mod dbscan;
pub mod distance;
pub mod event;
pub mod group;
pub mod home;
pub mod local;
pub mod photo;
pub mod point;
pub mod quantile;
pub mod time;

#[cfg(test)]
mod distance_test;
#[cfg(test)]
mod group_test;

pub use dbscan::{auto_eps, p_db_scan};
pub use distance::DistanceMatrix;
pub use event::{EventCluster, EventPolicy};
pub use group::PhotoGroup;
pub use home::{HomeProfile, infer_home, is_close_to_home};
pub use local::LocalCluster;
pub use photo::{AddressComponents, Photo};
pub use point::GeoPoint;
pub use time::time_diff_secs;
// Building blocks the pipeline reaches through the modules above, exported for tests and reuse
#[allow(unused_imports)]
pub use dbscan::DensityCluster;
#[allow(unused_imports)]
pub use event::RepresentativeLocation;
#[allow(unused_imports)]
pub use group::IntervalThreshold;
#[allow(unused_imports)]
pub use home::HomeTier;
#[allow(unused_imports)]
pub use distance::planar_distance;
#[allow(unused_imports)]
pub use quantile::{Quantiles, upper_fence};
#[allow(unused_imports)]
pub use time::{calendar_day_diff, is_same_day, parse_timestamp};
