//! Map surface: marker layer rebuilt from each map snapshot.
//!
//! Markers are never diffed or reused. Every snapshot produces a brand-new
//! layer, tagged with the sequence it was built from, and the previous
//! layer is discarded whole.

use crate::tracking::{MapLocation, Position, SafetyStatus, Snapshot, StatusCounts};
use serde::Serialize;

/// Initial map centre (Guwahati)
pub const DEFAULT_CENTER: Position = Position {
    lat: 26.1445,
    lng: 91.7362,
};
pub const DEFAULT_ZOOM: u8 = 7;

/// Open tile server definition handed to the rendering client
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    pub url_template: &'static str,
    pub attribution: &'static str,
    pub max_zoom: u8,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            attribution: "© OpenStreetMap contributors",
            max_zoom: 18,
        }
    }
}

/// Initial viewport and tiles
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapView {
    pub center: Position,
    pub zoom: u8,
    pub tiles: TileLayer,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            tiles: TileLayer::default(),
        }
    }
}

/// Marker fill and popup badge colours for a status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub fill: &'static str,
    pub badge_text: &'static str,
    pub badge_background: &'static str,
}

impl MarkerStyle {
    pub fn for_status(status: SafetyStatus) -> Self {
        match status {
            SafetyStatus::Safe => Self {
                fill: "#10b981",
                badge_text: "#059669",
                badge_background: "#dcfce7",
            },
            SafetyStatus::Distress => Self {
                fill: "#ef4444",
                badge_text: "#dc2626",
                badge_background: "#fee2e2",
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Popup {
    pub title: String,
    pub last_seen: String,
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub id: String,
    pub position: Position,
    pub status: SafetyStatus,
    pub style: MarkerStyle,
    pub popup: Popup,
}

impl From<&MapLocation> for Marker {
    fn from(location: &MapLocation) -> Self {
        Self {
            id: location.id.clone(),
            position: location.position,
            status: location.status,
            style: MarkerStyle::for_status(location.status),
            popup: Popup {
                title: location.name.clone(),
                last_seen: format!("Last seen: {}", location.last_update),
                status: location.status.to_string(),
            },
        }
    }
}

/// Full marker set for one map snapshot
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarkerLayer {
    /// Sequence of the snapshot this layer was built from
    pub sequence: u64,
    pub markers: Vec<Marker>,
    pub legend: StatusCounts,
}

impl MarkerLayer {
    /// Build a fresh layer: one marker per entity, in snapshot order
    pub fn rebuild(snapshot: &Snapshot<Vec<MapLocation>>) -> Self {
        Self {
            sequence: snapshot.sequence,
            markers: snapshot.data.iter().map(Marker::from).collect(),
            legend: StatusCounts::tally(&snapshot.data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::{seed, Feed, MapFeed, SnapshotStore};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_one_marker_per_location() {
        let (store, _writer) = SnapshotStore::new(seed::map_locations());
        let layer = MarkerLayer::rebuild(&store.current());

        assert_eq!(layer.sequence, 0);
        assert_eq!(layer.markers.len(), 4);
        assert_eq!(layer.legend, StatusCounts { safe: 3, distress: 1 });

        let mike = &layer.markers[2];
        assert_eq!(mike.style.fill, "#ef4444");
        assert_eq!(mike.popup.title, "Mike Johnson");
        assert_eq!(mike.popup.last_seen, "Last seen: 15 min ago");
        assert_eq!(mike.popup.status, "DISTRESS");

        assert_eq!(layer.markers[0].style.fill, "#10b981");
    }

    #[test]
    fn test_layer_rebuilt_for_each_snapshot() {
        let (store, writer) = SnapshotStore::new(seed::map_locations());
        let feed = MapFeed::default();
        let mut rng = StdRng::seed_from_u64(3);

        let before = MarkerLayer::rebuild(&store.current());
        writer.advance(|prev| feed.advance(prev, &mut rng));
        let after = MarkerLayer::rebuild(&store.current());

        assert_eq!(after.sequence, before.sequence + 1);
        assert_eq!(after.markers.len(), before.markers.len());
        for (marker, location) in after.markers.iter().zip(&store.current().data) {
            assert_eq!(marker.position, location.position);
            assert_eq!(marker.style, MarkerStyle::for_status(location.status));
        }
    }

    #[test]
    fn test_default_view() {
        let view = MapView::default();
        assert_eq!(view.zoom, 7);
        assert_eq!(view.tiles.attribution, "© OpenStreetMap contributors");
        assert_eq!(view.tiles.max_zoom, 18);
    }
}
