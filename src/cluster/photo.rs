use chrono::NaiveDateTime;
use std::fmt;

use super::point::GeoPoint;
use super::time::{format_timestamp, parse_timestamp};
use crate::error::Result;

/// Reverse-geocoded address parts, coarsest first
///
/// For Korean addresses the first component is the province or metropolitan
/// city (e.g. "서울특별시"), the second the district.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressComponents(pub [String; 3]);

impl AddressComponents {
    pub fn new(first: &str, second: &str, third: &str) -> Self {
        AddressComponents([first.to_string(), second.to_string(), third.to_string()])
    }

    pub fn first(&self) -> &str {
        &self.0[0]
    }

    pub fn second(&self) -> &str {
        &self.0[1]
    }

    /// "first second", the label used for places at home
    pub fn region_label(&self) -> String {
        format!("{} {}", self.0[0], self.0[1])
    }
}

/// One timestamped photo of a person
///
/// Photos are plain values: which local cluster a photo belongs to is tracked
/// by the owning [`crate::person::Person`], not by the photo.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub url: String,
    pub taken_at: NaiveDateTime,
    pub point: Option<GeoPoint>,
    pub formatted_address: Option<String>,
    pub address_components: Option<AddressComponents>,
    pub country: Option<String>,
}

impl Photo {
    pub fn new(url: &str, taken_at: NaiveDateTime) -> Self {
        Photo {
            url: url.to_string(),
            taken_at,
            point: None,
            formatted_address: None,
            address_components: None,
            country: None,
        }
    }

    /// Creates a photo from its `yyyyMMddHHmmss` timestamp
    ///
    /// A photo without a valid time cannot be ordered, so this fails instead
    /// of degrading.
    pub fn parse(url: &str, timestamp: &str) -> Result<Self> {
        Ok(Photo::new(url, parse_timestamp(timestamp)?))
    }

    pub fn with_point(mut self, longitude: f64, latitude: f64) -> Self {
        self.point = Some(GeoPoint::new(longitude, latitude));
        self
    }

    #[cfg(test)]
    pub fn with_address(mut self, formatted: &str, components: AddressComponents) -> Self {
        self.formatted_address = Some(formatted.to_string());
        self.address_components = Some(components);
        self
    }

    pub fn with_country(mut self, country: &str) -> Self {
        self.country = Some(country.to_string());
        self
    }

    pub fn has_point(&self) -> bool {
        self.point.is_some()
    }

    /// First address component, the city/province level region
    pub fn region(&self) -> Option<&str> {
        self.address_components.as_ref().map(|ac| ac.first())
    }

    /// Drops every address and country field
    pub fn clear_location_info(&mut self) {
        self.formatted_address = None;
        self.address_components = None;
        self.country = None;
    }
}

/// Tab separated: url, timestamp, longitude, latitude, formatted address,
/// three address components, country. Absent fields are empty.
impl fmt::Display for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.url, format_timestamp(&self.taken_at))?;

        match &self.point {
            Some(p) => write!(f, "\t{}\t{}", p.x(), p.y())?,
            None => write!(f, "\t\t")?,
        }

        write!(f, "\t{}", self.formatted_address.as_deref().unwrap_or(""))?;

        match &self.address_components {
            Some(ac) => write!(f, "\t{}\t{}\t{}", ac.0[0], ac.0[1], ac.0[2])?,
            None => write!(f, "\t\t\t")?,
        }

        write!(f, "\t{}", self.country.as_deref().unwrap_or(""))
    }
}
