//! Configuration for the maps binary, read from environment variables.

use std::env;
use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

use crate::options::{map_styles, ClustererOptions, MapTypeStyle};
use crate::zoom::{UnknownZoomLevel, ZoomLevel};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid MAPS_ZOOM: {0}")]
    Zoom(#[from] UnknownZoomLevel),

    #[error("invalid boolean for {name}: {value}")]
    Boolean { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct MapsConfig {
    pub zoom: ZoomLevel,
    pub clustering: bool,
    pub clusterer_options: ClustererOptions,
    pub map_styles: Vec<MapTypeStyle>,
    /// JSON file with the lists to render; mock data when unset.
    pub data_file: Option<PathBuf>,
    pub log_json: bool,
}

impl MapsConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MAPS_ZOOM`: zoom preset (default: automatic)
    /// - `MAPS_CLUSTERING`: enable marker clustering, `true`/`false` (default: true)
    /// - `MAPS_CLUSTERER_OPTIONS`: marker clusterer options as JSON (optional)
    /// - `MAPS_STYLES`: map styles as JSON (optional)
    /// - `MAPS_DATA_FILE`: path to a JSON list file (optional)
    /// - `MAPS_LOG_JSON`: log as JSON when set
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let zoom = match lookup("MAPS_ZOOM") {
            Some(raw) => raw.parse()?,
            None => ZoomLevel::default(),
        };
        let clustering = parse_bool("MAPS_CLUSTERING", lookup("MAPS_CLUSTERING"), true)?;
        let clusterer_options = ClustererOptions::parse(lookup("MAPS_CLUSTERER_OPTIONS").as_deref());
        if clusterer_options.style_count() == 0 {
            warn!("MAPS_CLUSTERER_OPTIONS has an empty styles list, clusters cannot be drawn");
        }

        Ok(Self {
            zoom,
            clustering,
            clusterer_options,
            map_styles: map_styles(lookup("MAPS_STYLES").as_deref()),
            data_file: lookup("MAPS_DATA_FILE")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            log_json: lookup("MAPS_LOG_JSON").is_some(),
        })
    }
}

fn parse_bool(
    name: &'static str,
    value: Option<String>,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::Boolean { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{default_cluster_styles, default_map_styles};
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<MapsConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MapsConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let config = config(&[]).unwrap();
        assert_eq!(config.zoom, ZoomLevel::Automatic);
        assert!(config.clustering);
        assert_eq!(config.clusterer_options.styles, Some(default_cluster_styles()));
        assert_eq!(config.map_styles, default_map_styles());
        assert_eq!(config.data_file, None);
        assert!(!config.log_json);
    }

    #[test]
    fn reads_variables() {
        let config = config(&[
            ("MAPS_ZOOM", "street"),
            ("MAPS_CLUSTERING", "no"),
            ("MAPS_CLUSTERER_OPTIONS", r#"{"imagePath": "img/m"}"#),
            ("MAPS_DATA_FILE", "lists.json"),
            ("MAPS_LOG_JSON", "1"),
        ])
        .unwrap();

        assert_eq!(config.zoom, ZoomLevel::Street);
        assert!(!config.clustering);
        assert_eq!(config.clusterer_options.image_path.as_deref(), Some("img/m"));
        assert_eq!(config.data_file, Some(PathBuf::from("lists.json")));
        assert!(config.log_json);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            config(&[("MAPS_ZOOM", "orbit")]),
            Err(ConfigError::Zoom(_))
        ));
        assert!(matches!(
            config(&[("MAPS_CLUSTERING", "maybe")]),
            Err(ConfigError::Boolean { name: "MAPS_CLUSTERING", .. })
        ));
    }
}
