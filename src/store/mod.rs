//! The timestamp store: persistence and query layer over saved records.
//!
//! The store exclusively owns the persisted collection. It is a prepend
//! log (records are totally ordered by insertion, newest first) and
//! every successful save or delete emits a change notification so
//! dependent surfaces (marker overlay, other open UIs) can re-query.
//!
//! Persistence failures never crash the caller: reads degrade to an empty
//! collection and writes report failure as a bool, both logged. This is a
//! best-effort cache policy, not a durability guarantee.

mod backend;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{channel, Receiver, Sender};

use tracing::{debug, warn};

pub use backend::{FileBackend, MemoryBackend, StorageBackend, StoreError};

use crate::record::{extract_video_id, TimestampRecord};

/// Change notification. Carries no payload by design: delivery is
/// at-least-once and consumers re-query instead of trusting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Changed,
}

/// Shared handle for the single-threaded cooperative contexts (popup,
/// content endpoint, CLI) that all touch one store.
pub type SharedStore = Rc<RefCell<TimestampStore>>;

/// The persistence and query layer over saved timestamp records.
pub struct TimestampStore {
    backend: Box<dyn StorageBackend>,
    records: Vec<TimestampRecord>,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl TimestampStore {
    /// Open a store over the given backend, loading the persisted
    /// collection and applying the one-time video-id migration.
    pub fn open(backend: Box<dyn StorageBackend>) -> Self {
        let mut store = Self {
            backend,
            records: Vec::new(),
            subscribers: Vec::new(),
        };
        store.load();
        store
    }

    pub fn open_shared(backend: Box<dyn StorageBackend>) -> SharedStore {
        Rc::new(RefCell::new(Self::open(backend)))
    }

    /// Read the persisted collection, back-filling missing video ids from
    /// the stored URL. The migrated form is persisted exactly once, and
    /// only if any record actually changed.
    fn load(&mut self) {
        let mut records = match self.backend.read() {
            Ok(records) => records,
            Err(e) => {
                warn!("storage read failed, treating collection as empty: {e}");
                Vec::new()
            }
        };

        let mut migrated = false;
        for record in &mut records {
            if !record.has_video_id() {
                if let Some(video_id) = extract_video_id(&record.video_url) {
                    record.video_id = video_id;
                    migrated = true;
                }
            }
        }

        self.records = records;

        if migrated {
            debug!("back-filled video ids for legacy records");
            self.persist();
        }
    }

    /// All records, newest first.
    pub fn records(&self) -> &[TimestampRecord] {
        &self.records
    }

    /// Prepend a record and persist. Returns whether the write stuck;
    /// notifies subscribers either way once the in-memory state changed.
    pub fn save(&mut self, record: TimestampRecord) -> bool {
        self.records.insert(0, record);
        let persisted = self.persist();
        self.notify();
        persisted
    }

    /// Remove the record with the matching id. A missing id is a no-op,
    /// not an error; nothing is persisted or notified in that case.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            return false;
        }
        self.persist();
        self.notify();
        true
    }

    /// All records for one video, preserving store order (newest first).
    pub fn query_by_video(&self, video_id: &str) -> Vec<TimestampRecord> {
        self.records
            .iter()
            .filter(|r| r.video_id == video_id)
            .cloned()
            .collect()
    }

    /// Subscribe to change notifications. Receivers that go away are
    /// dropped on the next notification.
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self) {
        self.subscribers
            .retain(|tx| tx.send(StoreEvent::Changed).is_ok());
    }

    fn persist(&mut self) -> bool {
        match self.backend.write(&self.records) {
            Ok(()) => true,
            Err(e) => {
                warn!("storage write failed, keeping in-memory state: {e}");
                false
            }
        }
    }
}

impl std::fmt::Debug for TimestampStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimestampStore")
            .field("records", &self.records.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
