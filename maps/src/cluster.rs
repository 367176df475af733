//! Cluster icon selection.
//!
//! The clustering library groups nearby markers and asks, per cluster, which
//! of its icon styles to draw. Bigger clusters get a higher style index, one
//! step per power of five markers:
//!
//! | markers   | index |
//! |-----------|-------|
//! | 1..=4     | 1     |
//! | 5..=24    | 2     |
//! | 25..=124  | 3     |
//! | 125..=624 | 4     |
//!
//! The index is clamped to the last available style.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::marker::Marker;

/// Each style step covers this many times more markers than the previous one.
const BUCKET_BASE: usize = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClusterError {
    #[error("cluster has no markers")]
    EmptyCluster,

    #[error("no cluster styles available")]
    NoStyles,
}

/// Label and style for one cluster, as consumed by the clustering library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterIcon {
    pub text: String,
    pub index: usize,
    pub title: String,
}

/// Pick the style index for a cluster of `marker_count` markers.
///
/// Returns an index in `0..available_styles`.
pub fn select_style_index(
    marker_count: usize,
    available_styles: usize,
) -> Result<usize, ClusterError> {
    if marker_count == 0 {
        return Err(ClusterError::EmptyCluster);
    }
    if available_styles == 0 {
        return Err(ClusterError::NoStyles);
    }

    let mut remaining = marker_count;
    let mut index = 0;
    while remaining != 0 {
        remaining /= BUCKET_BASE;
        index += 1;
    }

    Ok(index.min(available_styles - 1))
}

/// Build the icon for a cluster of markers.
pub fn calculate(markers: &[Marker], available_styles: usize) -> Result<ClusterIcon, ClusterError> {
    let count = markers.len();
    let index = select_style_index(count, available_styles)?;

    Ok(ClusterIcon {
        text: count.to_string(),
        index,
        title: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LatLng;

    fn markers(n: usize) -> Vec<Marker> {
        (0..n)
            .map(|i| Marker::new(format!("m{i}").as_str(), LatLng::new(0.0, 0.0)))
            .collect()
    }

    #[test]
    fn single_marker_uses_first_bucket() {
        assert_eq!(select_style_index(1, 5), Ok(1));
        assert_eq!(select_style_index(4, 5), Ok(1));
    }

    #[test]
    fn buckets_follow_powers_of_five() {
        assert_eq!(select_style_index(5, 5), Ok(2));
        assert_eq!(select_style_index(24, 5), Ok(2));
        assert_eq!(select_style_index(25, 5), Ok(3));
        assert_eq!(select_style_index(124, 5), Ok(3));
        assert_eq!(select_style_index(125, 5), Ok(4));
    }

    #[test]
    fn larger_clusters_never_get_smaller_index() {
        assert!(select_style_index(25, 5).unwrap() > select_style_index(5, 5).unwrap());

        let mut previous = 0;
        for count in 1..5_000 {
            let index = select_style_index(count, 10).unwrap();
            assert!(index >= previous, "index dropped at {count}");
            previous = index;
        }
    }

    #[test]
    fn index_stays_within_available_styles() {
        for styles in 1..8 {
            for count in [1, 4, 5, 24, 25, 124, 125, 624, 625, 3_125, 1_000_000] {
                let index = select_style_index(count, styles).unwrap();
                assert!(index < styles, "count {count} styles {styles} gave {index}");
            }
        }
    }

    #[test]
    fn huge_cluster_clamps_to_last_style() {
        assert_eq!(select_style_index(625, 5), Ok(4));
        assert_eq!(select_style_index(usize::MAX, 5), Ok(4));
        assert_eq!(select_style_index(1, 1), Ok(0));
    }

    #[test]
    fn degenerate_inputs_are_errors() {
        assert_eq!(select_style_index(0, 5), Err(ClusterError::EmptyCluster));
        assert_eq!(select_style_index(3, 0), Err(ClusterError::NoStyles));
        assert_eq!(calculate(&[], 5), Err(ClusterError::EmptyCluster));
    }

    #[test]
    fn icon_labels_cluster_with_count() {
        let icon = calculate(&markers(30), 5).unwrap();
        assert_eq!(
            icon,
            ClusterIcon {
                text: "30".to_string(),
                index: 3,
                title: String::new(),
            }
        );
    }
}
