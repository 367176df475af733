//! Map markers and info-window selection.
//!
//! Markers are rebuilt on every render, so selection is tracked by
//! [`MarkerId`] rather than by the marker value itself.

use maps_source::ListValue;
use serde::{Deserialize, Serialize};

use crate::geo::LatLng;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerId(pub String);

impl From<&str> for MarkerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Opaque handle of an action the host executes when a marker is clicked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: MarkerId,
    pub position: LatLng,
    pub title: Option<String>,
    pub icon_url: Option<String>,
    pub on_click: Option<ActionId>,
}

impl Marker {
    pub fn new(id: impl Into<MarkerId>, position: LatLng) -> Self {
        Self {
            id: id.into(),
            position,
            title: None,
            icon_url: None,
            on_click: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_icon(mut self, url: impl Into<String>) -> Self {
        self.icon_url = Some(url.into());
        self
    }

    pub fn with_action(mut self, action: ActionId) -> Self {
        self.on_click = Some(action);
        self
    }

    fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Markers react to clicks only when they have something to show or run.
    pub fn is_clickable(&self) -> bool {
        self.has_title() || self.on_click.is_some()
    }
}

/// What a marker click resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// The info window of this marker is now open.
    Selected(MarkerId),
    /// The info window that was open for this marker is now closed.
    Deselected(MarkerId),
    /// The marker has no info window; the host should run this action.
    Action(ActionId),
    Ignored,
}

/// Which marker, if any, currently shows its info window.
#[derive(Debug, Clone, Default)]
pub struct MarkerSelection {
    selected: Option<MarkerId>,
}

impl MarkerSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&MarkerId> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, marker: &Marker) -> bool {
        self.selected.as_ref() == Some(&marker.id)
    }

    /// Titled markers toggle their info window; the rest fire their action.
    pub fn click(&mut self, marker: &Marker) -> ClickOutcome {
        if marker.has_title() {
            if self.is_selected(marker) {
                self.selected = None;
                ClickOutcome::Deselected(marker.id.clone())
            } else {
                self.selected = Some(marker.id.clone());
                ClickOutcome::Selected(marker.id.clone())
            }
        } else if let Some(action) = &marker.on_click {
            ClickOutcome::Action(action.clone())
        } else {
            ClickOutcome::Ignored
        }
    }

    /// Close the info window of `marker`. A no-op if another marker took over.
    pub fn close(&mut self, marker: &Marker) {
        if self.is_selected(marker) {
            self.selected = None;
        }
    }
}

/// Attribute names used to read markers out of list items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerFields {
    pub latitude: String,
    pub longitude: String,
    pub title: Option<String>,
}

impl Default for MarkerFields {
    fn default() -> Self {
        Self {
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
            title: None,
        }
    }
}

/// Build markers from the items of a list data source.
///
/// Lists that are not available yet produce no markers. Items without a valid
/// coordinate pair are skipped.
pub fn markers_from_list(list: &ListValue, fields: &MarkerFields) -> Vec<Marker> {
    if !list.is_available() {
        return Vec::new();
    }

    list.items
        .iter()
        .filter_map(|item| {
            let lat = item.get(&fields.latitude).and_then(|v| v.as_f64());
            let lng = item.get(&fields.longitude).and_then(|v| v.as_f64());
            let position = match (lat, lng) {
                (Some(lat), Some(lng)) if LatLng::new(lat, lng).is_valid() => LatLng::new(lat, lng),
                _ => {
                    tracing::debug!(item = %item.id, "Skipping marker without valid coordinates");
                    return None;
                }
            };

            let mut marker = Marker::new(MarkerId(item.id.clone()), position);
            marker.title = fields
                .title
                .as_deref()
                .and_then(|name| item.get(name))
                .and_then(|v| v.as_str())
                .map(str::to_string);
            Some(marker)
        })
        .collect()
}
