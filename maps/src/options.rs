//! User-supplied JSON options: marker clusterer settings and map styles.
//!
//! Both are free-form JSON typed in by the app author, so a broken value is
//! logged and replaced by the defaults instead of failing the render.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of icon styles the clusterer draws with when none are configured.
pub const DEFAULT_STYLE_COUNT: usize = 5;

/// One cluster icon. Keys other than the size and url (`textColor`,
/// `anchorText`, ...) are handed to the clusterer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterIconStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClusterIconStyle {
    fn square(size: u32, url: &str) -> Self {
        Self {
            height: Some(size),
            width: Some(size),
            url: Some(url.to_string()),
            extra: Map::new(),
        }
    }
}

/// The five bundled cluster icons, smallest first.
pub fn default_cluster_styles() -> Vec<ClusterIconStyle> {
    vec![
        ClusterIconStyle::square(53, "m1.png"),
        ClusterIconStyle::square(56, "m2.png"),
        ClusterIconStyle::square(66, "m3.png"),
        ClusterIconStyle::square(77, "m4.png"),
        ClusterIconStyle::square(88, "m5.png"),
    ]
}

/// Options passed through to the marker clusterer.
///
/// Only `styles` and `imagePath` are interpreted; any other key is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClustererOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Vec<ClusterIconStyle>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ClustererOptions {
    fn default() -> Self {
        Self {
            styles: Some(default_cluster_styles()),
            image_path: None,
            extra: Map::new(),
        }
    }
}

impl ClustererOptions {
    /// Parse the configured options, falling back to the bundled icons.
    ///
    /// `"styles": null` counts as absent, so the bundled icons are injected.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::default();
        };

        match serde_json::from_str::<ClustererOptions>(raw) {
            Ok(mut options) => {
                if options.styles.is_none() && options.image_path.is_none() {
                    options.styles = Some(default_cluster_styles());
                }
                options
            }
            Err(error) => {
                tracing::error!(error = %error, "Invalid MarkerClusterer options");
                Self::default()
            }
        }
    }

    /// How many styles the clusterer can pick from.
    ///
    /// With only an `imagePath` the clusterer generates its own icon set of
    /// the default size.
    pub fn style_count(&self) -> usize {
        self.styles
            .as_ref()
            .map_or(DEFAULT_STYLE_COUNT, |styles| styles.len())
    }
}

/// One entry of a map style definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapTypeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,

    #[serde(default)]
    pub stylers: Vec<Map<String, Value>>,
}

/// Default style: hide point-of-interest labels.
pub fn default_map_styles() -> Vec<MapTypeStyle> {
    let mut visibility = Map::new();
    visibility.insert("visibility".to_string(), Value::String("off".to_string()));

    vec![MapTypeStyle {
        feature_type: Some("poi".to_string()),
        element_type: Some("labels".to_string()),
        stylers: vec![visibility],
    }]
}

/// Parse the configured map styles, falling back to [`default_map_styles`].
pub fn map_styles(raw: Option<&str>) -> Vec<MapTypeStyle> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return default_map_styles();
    };

    serde_json::from_str(raw).unwrap_or_else(|error| {
        tracing::error!(error = %error, "Invalid Map styles");
        default_map_styles()
    })
}
