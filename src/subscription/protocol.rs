use crate::map::MarkerLayer;
use crate::tracking::{
    MapLocation, Snapshot, StatCard, StatsCounters, StatusCounts, TouristRecord,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Dashboard surface a client can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Map,
    Tourists,
    Stats,
}

/// Client → Server message types
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "subscribe")]
    Subscribe { channel: Channel },
    #[serde(rename = "unsubscribe")]
    Unsubscribe { channel: Channel },
}

/// Server → Client: map snapshot replaced
#[derive(Debug, Clone, Serialize)]
pub struct MapSnapshotMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub locations: Vec<MapLocation>,
    /// Freshly built marker layer; clients drop their previous markers
    pub layer: MarkerLayer,
}

impl From<&Snapshot<Vec<MapLocation>>> for MapSnapshotMessage {
    fn from(snapshot: &Snapshot<Vec<MapLocation>>) -> Self {
        Self {
            msg_type: "map_snapshot".to_string(),
            sequence: snapshot.sequence,
            timestamp: snapshot.taken_at,
            locations: snapshot.data.clone(),
            layer: MarkerLayer::rebuild(snapshot),
        }
    }
}

/// Server → Client: tourist list snapshot replaced
#[derive(Debug, Clone, Serialize)]
pub struct TouristSnapshotMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub tourists: Vec<TouristRecord>,
    pub counts: StatusCounts,
}

impl From<&Snapshot<Vec<TouristRecord>>> for TouristSnapshotMessage {
    fn from(snapshot: &Snapshot<Vec<TouristRecord>>) -> Self {
        Self {
            msg_type: "tourist_snapshot".to_string(),
            sequence: snapshot.sequence,
            timestamp: snapshot.taken_at,
            tourists: snapshot.data.clone(),
            counts: StatusCounts::tally(&snapshot.data),
        }
    }
}

/// Server → Client: stat counters redrawn
#[derive(Debug, Clone, Serialize)]
pub struct StatsUpdateMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub stats: StatsCounters,
    pub cards: Vec<StatCard>,
}

impl From<&Snapshot<StatsCounters>> for StatsUpdateMessage {
    fn from(snapshot: &Snapshot<StatsCounters>) -> Self {
        Self {
            msg_type: "stats_update".to_string(),
            sequence: snapshot.sequence,
            timestamp: snapshot.taken_at,
            stats: snapshot.data,
            cards: snapshot.data.cards(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::{seed, SnapshotStore};

    #[test]
    fn test_parse_client_messages() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"subscribe","channel":"map"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Subscribe { channel: Channel::Map });

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"unsubscribe","channel":"stats"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Unsubscribe { channel: Channel::Stats });

        let unknown = r#"{"type":"subscribe","channel":"x"}"#;
        assert!(serde_json::from_str::<ClientMessage>(unknown).is_err());
    }

    #[test]
    fn test_map_snapshot_message_shape() {
        let (store, _writer) = SnapshotStore::new(seed::map_locations());
        let msg = MapSnapshotMessage::from(store.current().as_ref());
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["type"], "map_snapshot");
        assert_eq!(json["sequence"], 0);
        assert_eq!(json["locations"].as_array().unwrap().len(), 4);
        assert_eq!(json["locations"][0]["lat"], 26.1445);
        assert_eq!(json["locations"][0]["lastUpdate"], "2 min ago");
        assert_eq!(json["layer"]["markers"].as_array().unwrap().len(), 4);
        assert_eq!(json["layer"]["legend"]["distress"], 1);
    }

    #[test]
    fn test_tourist_snapshot_message_shape() {
        let (store, _writer) = SnapshotStore::new(seed::tourist_records());
        let msg = TouristSnapshotMessage::from(store.current().as_ref());
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["type"], "tourist_snapshot");
        assert_eq!(json["tourists"][2]["fullName"], "Mike Johnson");
        assert_eq!(json["tourists"][2]["status"], "distress");
        assert_eq!(json["counts"]["safe"], 5);
    }
}
