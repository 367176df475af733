//! # Maps
//!
//! Decision logic behind a map widget: which icon a marker cluster gets, and
//! which heatmap layers are drawn.
//!
//! ## Modules
//!
//! - [`cluster`]: style index selection for marker clusters
//! - [`heatmap`]: heatmap specs, point expressions and the resolver
//! - [`marker`]: markers, markers from lists, info-window selection
//! - [`options`]: clusterer options and map styles from user JSON
//! - [`zoom`]: zoom presets and the initial viewport
//! - [`geo`]: coordinates and bounds
//! - [`config`]: environment configuration for the binary
//!
//! ## Usage
//!
//! ```ignore
//! use maps::cluster;
//! use maps::heatmap::{CompleteDataFilter, HeatmapResolver};
//!
//! let icon = cluster::calculate(&markers, options.style_count())?;
//!
//! let resolver = HeatmapResolver::current(CompleteDataFilter)?;
//! let layers = resolver.resolve(&specs);
//! ```

pub mod cluster;
pub mod config;
pub mod geo;
pub mod heatmap;
pub mod marker;
pub mod options;
pub mod zoom;

pub use cluster::{ClusterError, ClusterIcon};
pub use config::{ConfigError, MapsConfig};
pub use heatmap::{Heatmap, HeatmapResolver, HeatmapSpec, ResolveError};
pub use marker::Marker;

use thiserror::Error;

/// Errors surfaced by the maps crate.
#[derive(Error, Debug)]
pub enum MapsError {
    #[error("Cluster error: {0}")]
    Cluster(#[from] ClusterError),

    #[error("Heatmap error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("List source error: {0}")]
    Source(#[from] maps_source::ListSourceError),
}
