use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

/// One immutable generation of a surface's data
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<T> {
    /// 0 for the seed, +1 on every replacement
    pub sequence: u64,
    pub taken_at: DateTime<Utc>,
    pub data: T,
}

/// Holds the current snapshot of one surface and announces replacements.
///
/// Reads are an `Arc` clone. Writes go through the single [`SnapshotWriter`]
/// handed out at construction, so the owning feed task is the only writer.
pub struct SnapshotStore<T> {
    current: RwLock<Arc<Snapshot<T>>>,
    updates: broadcast::Sender<Arc<Snapshot<T>>>,
}

impl<T> SnapshotStore<T> {
    /// Create a store seeded with `seed` (sequence 0) and its writer
    pub fn new(seed: T) -> (Arc<Self>, SnapshotWriter<T>) {
        let (updates, _) = broadcast::channel(16);
        let store = Arc::new(Self {
            current: RwLock::new(Arc::new(Snapshot {
                sequence: 0,
                taken_at: Utc::now(),
                data: seed,
            })),
            updates,
        });

        let writer = SnapshotWriter {
            store: Arc::clone(&store),
        };
        (store, writer)
    }

    /// Current snapshot
    pub fn current(&self) -> Arc<Snapshot<T>> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Subscribe to snapshot replacements
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Snapshot<T>>> {
        self.updates.subscribe()
    }
}

/// Exclusive write handle for a [`SnapshotStore`]. Not cloneable.
pub struct SnapshotWriter<T> {
    store: Arc<SnapshotStore<T>>,
}

impl<T> SnapshotWriter<T> {
    /// Replace the whole snapshot with `next(previous)` and broadcast it
    pub fn advance(&self, next: impl FnOnce(&T) -> T) -> Arc<Snapshot<T>> {
        let previous = self.store.current();
        let snapshot = Arc::new(Snapshot {
            sequence: previous.sequence + 1,
            taken_at: Utc::now(),
            data: next(&previous.data),
        });

        {
            let mut guard = self
                .store
                .current
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *guard = Arc::clone(&snapshot);
        }

        // No subscribers is fine
        let _ = self.store.updates.send(Arc::clone(&snapshot));

        snapshot
    }

    pub fn store(&self) -> &Arc<SnapshotStore<T>> {
        &self.store
    }
}
