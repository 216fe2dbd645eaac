// WebSocket subscriptions to dashboard snapshot streams

pub mod manager;
pub mod protocol;

pub use manager::ConnectionManager;
pub use protocol::{
    Channel, ClientMessage, MapSnapshotMessage, StatsUpdateMessage, TouristSnapshotMessage,
};
