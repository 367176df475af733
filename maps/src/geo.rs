//! Geographic primitives shared by markers, heatmaps and the viewport.

use serde::{Deserialize, Serialize};

/// Centre used when there is nothing to show (Utrecht, NL).
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 52.0907374,
    lng: 5.1214201,
};

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both coordinates finite and within the valid degree ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Axis-aligned bounding box that starts empty and grows with `extend`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    south_west: Option<LatLng>,
    north_east: Option<LatLng>,
}

impl LatLngBounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, point: LatLng) {
        match (self.south_west.as_mut(), self.north_east.as_mut()) {
            (Some(sw), Some(ne)) => {
                sw.lat = sw.lat.min(point.lat);
                sw.lng = sw.lng.min(point.lng);
                ne.lat = ne.lat.max(point.lat);
                ne.lng = ne.lng.max(point.lng);
            }
            _ => {
                self.south_west = Some(point);
                self.north_east = Some(point);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.south_west.is_none()
    }

    pub fn south_west(&self) -> Option<LatLng> {
        self.south_west
    }

    pub fn north_east(&self) -> Option<LatLng> {
        self.north_east
    }

    /// Midpoint of the box, `None` when empty.
    pub fn center(&self) -> Option<LatLng> {
        let (sw, ne) = (self.south_west?, self.north_east?);
        Some(LatLng::new((sw.lat + ne.lat) / 2.0, (sw.lng + ne.lng) / 2.0))
    }

    pub fn contains(&self, point: LatLng) -> bool {
        match (self.south_west, self.north_east) {
            (Some(sw), Some(ne)) => {
                (sw.lat..=ne.lat).contains(&point.lat) && (sw.lng..=ne.lng).contains(&point.lng)
            }
            _ => false,
        }
    }
}
