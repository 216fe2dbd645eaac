// Mock tracking feeds, snapshot stores and the list filter

mod dashboard;
mod entity;
mod feed;
mod filter;
pub mod seed;
mod stats;
mod store;

pub use dashboard::{run_feed, Dashboard, DashboardWriters};
pub use entity::{
    LabelStyle, MapLocation, Position, SafetyStatus, StatusCounts, TimeAgo, TouristRecord, Tracked,
};
pub use feed::{Feed, ListFeed, MapFeed};
pub use filter::{filter_tourists, FilteredView, StatusFilter, TouristQuery, UnknownStatusFilter};
pub use stats::{StatCard, StatKind, StatsCounters, StatsFeed, SAFE_ZONES};
pub use store::{Snapshot, SnapshotStore, SnapshotWriter};
