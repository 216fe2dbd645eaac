use super::entity::{MapLocation, TouristRecord};
use super::feed::Feed;
use super::seed;
use super::stats::{StatsCounters, StatsFeed};
use super::store::{SnapshotStore, SnapshotWriter};
use crate::config::FeedsConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Drive `feed` on a fixed period, replacing the store's snapshot each tick.
///
/// The first tick fires one full period after start; the seed stays visible
/// until then. Runs until the task is aborted.
pub async fn run_feed<F: Feed>(feed: F, writer: SnapshotWriter<F::State>, period: Duration) {
    let mut rng = StdRng::from_entropy();
    let mut ticker = interval_at(Instant::now() + period, period);

    // Skip missed ticks instead of bursting to catch up
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let snapshot = writer.advance(|previous| feed.advance(previous, &mut rng));
        debug!(feed = F::NAME, sequence = snapshot.sequence, "Feed tick");
    }
}

/// The live monitor: one snapshot store per surface, each driven by its own
/// uncoordinated timer.
///
/// The three streams share no source of truth. The stats counters in
/// particular never reflect the map or list contents.
pub struct Dashboard {
    pub map: Arc<SnapshotStore<Vec<MapLocation>>>,
    pub tourists: Arc<SnapshotStore<Vec<TouristRecord>>>,
    pub stats: Arc<SnapshotStore<StatsCounters>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    unmounted: watch::Sender<bool>,
}

/// Writers for a freshly seeded dashboard, before any timer owns them
pub struct DashboardWriters {
    pub map: SnapshotWriter<Vec<MapLocation>>,
    pub tourists: SnapshotWriter<Vec<TouristRecord>>,
    pub stats: SnapshotWriter<StatsCounters>,
}

impl Dashboard {
    /// Seed all three stores without starting any timer.
    ///
    /// Stats are drawn once here, so the cards never show an all-zero state.
    pub fn seeded() -> (Self, DashboardWriters) {
        let (map, map_writer) = SnapshotStore::new(seed::map_locations());
        let (tourists, tourists_writer) = SnapshotStore::new(seed::tourist_records());
        let (stats, stats_writer) =
            SnapshotStore::new(StatsCounters::draw(&mut StdRng::from_entropy()));

        let dashboard = Self {
            map,
            tourists,
            stats,
            tasks: Mutex::new(Vec::new()),
            unmounted: watch::Sender::new(false),
        };
        let writers = DashboardWriters {
            map: map_writer,
            tourists: tourists_writer,
            stats: stats_writer,
        };
        (dashboard, writers)
    }

    /// Seed the stores and start the three feed timers.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(config: &FeedsConfig) -> Self {
        let (dashboard, writers) = Self::seeded();

        let handles = vec![
            tokio::spawn(run_feed(
                config.map.feed(),
                writers.map,
                config.map.interval(),
            )),
            tokio::spawn(run_feed(
                config.list.feed(),
                writers.tourists,
                config.list.interval(),
            )),
            tokio::spawn(run_feed(
                StatsFeed,
                writers.stats,
                config.stats.interval(),
            )),
        ];

        info!(
            map_interval_ms = config.map.interval_ms,
            list_interval_ms = config.list.interval_ms,
            stats_interval_ms = config.stats.interval_ms,
            "Dashboard mounted"
        );

        *dashboard.tasks.lock().unwrap_or_else(PoisonError::into_inner) = handles;
        dashboard
    }

    /// Whether any feed timer is still scheduled
    pub fn is_mounted(&self) -> bool {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|task| !task.is_finished())
    }

    /// Flips to `true` once the dashboard is unmounted
    pub fn unmounted(&self) -> watch::Receiver<bool> {
        self.unmounted.subscribe()
    }

    /// Cancel every feed timer and signal live subscribers to close.
    /// Idempotent; also runs on drop.
    pub fn unmount(&self) {
        self.unmounted.send_replace(true);

        let tasks: Vec<JoinHandle<()>> = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();

        if tasks.is_empty() {
            return;
        }

        for task in &tasks {
            task.abort();
        }
        info!(timers = tasks.len(), "Dashboard unmounted");
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.unmount();
    }
}

