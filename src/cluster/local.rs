use super::group::PhotoGroup;
use super::photo::{AddressComponents, Photo};
use crate::lookup::ApproxLocation;

/// A place: photos grouped by spatial density
#[derive(Debug, Clone, PartialEq)]
pub struct LocalCluster {
    pub group: PhotoGroup,
    pub is_home: bool,
}

impl LocalCluster {
    pub fn new(group: PhotoGroup) -> Self {
        LocalCluster {
            group,
            is_home: false,
        }
    }

    pub fn id(&self) -> usize {
        self.group.id
    }

    /// Geo-tagged member nearest to the numeric centroid
    ///
    /// Address data lives on photos, so a lookup has to be keyed by a real
    /// photo coordinate rather than by the centroid itself.
    pub fn photo_for_lookup(&self, photos: &[Photo]) -> Option<usize> {
        let center = self.group.centroid(photos)?;
        let mut best: Option<(usize, f64)> = None;

        for &i in &self.group.members {
            let Some(point) = &photos[i].point else {
                continue;
            };
            let d = center.dist(point);
            if best.is_none_or(|(_, min)| d < min) {
                best = Some((i, d));
            }
        }

        best.map(|(i, _)| i)
    }

    /// Fills missing country and address components of every member
    pub fn apply_approximate_location(&self, photos: &mut [Photo], location: &ApproxLocation) {
        let components = AddressComponents::new(&location.first, &location.second, "");

        for &i in &self.group.members {
            let photo = &mut photos[i];
            if photo.country.is_none() {
                photo.country = Some(location.country.clone());
            }
            if photo.address_components.is_none() {
                photo.address_components = Some(components.clone());
            }
        }
    }
}
