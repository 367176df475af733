//! Zoom presets and the initial viewport.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geo::{LatLng, LatLngBounds, DEFAULT_CENTER};
use crate::marker::Marker;

pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomLevel {
    /// Fit the view to the markers.
    #[default]
    Automatic,
    World,
    Continent,
    ZoomLevel6,
    ZoomLevel7,
    ZoomLevel8,
    ZoomLevel9,
    City,
    Street,
    Buildings,
}

impl ZoomLevel {
    /// Map zoom for the preset. `Automatic` has no fixed zoom and reports the minimum.
    pub fn level(self) -> u8 {
        match self {
            Self::Automatic | Self::World => MIN_ZOOM,
            Self::Continent => 5,
            Self::ZoomLevel6 => 6,
            Self::ZoomLevel7 => 7,
            Self::ZoomLevel8 => 8,
            Self::ZoomLevel9 => 9,
            Self::City => 10,
            Self::Street => 15,
            Self::Buildings => MAX_ZOOM,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Automatic => "automatic",
            Self::World => "world",
            Self::Continent => "continent",
            Self::ZoomLevel6 => "zoomlevel6",
            Self::ZoomLevel7 => "zoomlevel7",
            Self::ZoomLevel8 => "zoomlevel8",
            Self::ZoomLevel9 => "zoomlevel9",
            Self::City => "city",
            Self::Street => "street",
            Self::Buildings => "buildings",
        }
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown zoom level: {0}")]
pub struct UnknownZoomLevel(pub String);

impl FromStr for ZoomLevel {
    type Err = UnknownZoomLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.trim().to_lowercase().as_str() {
            "automatic" => Self::Automatic,
            "world" => Self::World,
            "continent" => Self::Continent,
            "zoomlevel6" => Self::ZoomLevel6,
            "zoomlevel7" => Self::ZoomLevel7,
            "zoomlevel8" => Self::ZoomLevel8,
            "zoomlevel9" => Self::ZoomLevel9,
            "city" => Self::City,
            "street" => Self::Street,
            "buildings" => Self::Buildings,
            _ => return Err(UnknownZoomLevel(s.to_string())),
        };
        Ok(level)
    }
}

/// How the map should position itself after the markers changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum Viewport {
    FitBounds { bounds: LatLngBounds },
    Center { center: LatLng, zoom: u8 },
}

impl Viewport {
    /// Viewport covering all markers and the current location.
    ///
    /// Falls back to [`DEFAULT_CENTER`] when there is nothing to show.
    ///
    /// Every marker extends the bounds, not only the first one as the earlier
    /// widget did.
    pub fn compute(markers: &[Marker], current_location: Option<&Marker>, zoom: ZoomLevel) -> Self {
        let mut bounds = LatLngBounds::new();
        for marker in markers.iter().chain(current_location) {
            bounds.extend(marker.position);
        }
        if bounds.is_empty() {
            bounds.extend(DEFAULT_CENTER);
        }

        match zoom {
            ZoomLevel::Automatic => Viewport::FitBounds { bounds },
            fixed => Viewport::Center {
                center: bounds.center().unwrap_or(DEFAULT_CENTER),
                zoom: fixed.level(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_translate_to_zoom() {
        assert_eq!(ZoomLevel::World.level(), 1);
        assert_eq!(ZoomLevel::Continent.level(), 5);
        assert_eq!(ZoomLevel::ZoomLevel8.level(), 8);
        assert_eq!(ZoomLevel::City.level(), 10);
        assert_eq!(ZoomLevel::Street.level(), 15);
        assert_eq!(ZoomLevel::Buildings.level(), 20);
        assert_eq!(ZoomLevel::Automatic.level(), 1);
    }

    #[test]
    fn presets_parse_case_insensitively() {
        assert_eq!("City".parse::<ZoomLevel>(), Ok(ZoomLevel::City));
        assert_eq!(" zoomlevel9 ".parse::<ZoomLevel>(), Ok(ZoomLevel::ZoomLevel9));
        assert_eq!(
            "galaxy".parse::<ZoomLevel>(),
            Err(UnknownZoomLevel("galaxy".to_string()))
        );

        for level in [ZoomLevel::Automatic, ZoomLevel::ZoomLevel6, ZoomLevel::Buildings] {
            assert_eq!(level.to_string().parse::<ZoomLevel>(), Ok(level));
        }
    }

    #[test]
    fn empty_map_centers_on_default() {
        assert_eq!(
            Viewport::compute(&[], None, ZoomLevel::City),
            Viewport::Center {
                center: DEFAULT_CENTER,
                zoom: 10
            }
        );
    }

    #[test]
    fn automatic_zoom_fits_markers_and_location() {
        let markers = vec![
            Marker::new("a", LatLng::new(10.0, 10.0)),
            Marker::new("b", LatLng::new(20.0, 30.0)),
        ];
        let here = Marker::new("here", LatLng::new(0.0, 0.0));

        let Viewport::FitBounds { bounds } = Viewport::compute(&markers, Some(&here), ZoomLevel::Automatic)
        else {
            panic!("expected FitBounds");
        };
        assert_eq!(bounds.south_west(), Some(LatLng::new(0.0, 0.0)));
        assert_eq!(bounds.north_east(), Some(LatLng::new(20.0, 30.0)));
    }

    #[test]
    fn fixed_zoom_centers_on_markers() {
        let markers = vec![
            Marker::new("a", LatLng::new(10.0, 10.0)),
            Marker::new("b", LatLng::new(20.0, 30.0)),
        ];

        assert_eq!(
            Viewport::compute(&markers, None, ZoomLevel::Street),
            Viewport::Center {
                center: LatLng::new(15.0, 20.0),
                zoom: 15
            }
        );
    }
}
