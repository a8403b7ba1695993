//! Working set: the ordered, persisted collection of people.
//!
//! Every mutation builds the next collection, hands it to the [`BlobStore`],
//! and only replaces the in-memory state once the save succeeded. A failed
//! save leaves the observable state exactly as it was.

use anyhow::{anyhow, Result};
use chrono::Utc;
use log::{debug, warn};
use std::sync::{Arc, Mutex};

use crate::error::StoreError;
use crate::models::{Person, Stats};

/// Key-value persistence collaborator holding the serialized working set.
pub trait BlobStore {
    fn load(&self) -> Result<Option<Vec<u8>>>;
    fn save(&self, blob: &[u8]) -> Result<()>;
}

impl<S: BlobStore + ?Sized> BlobStore for &S {
    fn load(&self) -> Result<Option<Vec<u8>>> {
        (**self).load()
    }

    fn save(&self, blob: &[u8]) -> Result<()> {
        (**self).save(blob)
    }
}

/// In-process store. Clones share the same bytes, so a test can keep a
/// handle to inspect what was written or to make saves fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    blob: Option<Vec<u8>>,
    fail_saves: bool,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<Vec<u8>>) -> Self {
        let store = Self::default();
        store.lock().blob = Some(blob.into());
        store
    }

    /// Make every following `save` fail until switched back.
    pub fn set_fail_saves(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    pub fn blob(&self) -> Option<Vec<u8>> {
        self.lock().blob.clone()
    }

    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        // A poisoned lock only means another holder panicked mid-update of plain data.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl BlobStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.lock().blob.clone())
    }

    fn save(&self, blob: &[u8]) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_saves {
            return Err(anyhow!("memory store is read-only"));
        }
        inner.blob = Some(blob.to_vec());
        inner.saves += 1;
        Ok(())
    }
}

pub struct WorkingSet<S: BlobStore> {
    store: S,
    people: Vec<Person>,
    last_stamp: i64,
}

impl<S: BlobStore> WorkingSet<S> {
    /// Load the persisted set. Unreadable or malformed blobs yield an empty set.
    pub fn open(store: S) -> Self {
        let people = match store.load() {
            Ok(Some(blob)) => match serde_json::from_slice::<Vec<Person>>(&blob) {
                Ok(people) => people,
                Err(e) => {
                    warn!("discarding unreadable working set: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("failed to load working set: {:#}", e);
                Vec::new()
            }
        };

        let last_stamp = people
            .iter()
            .filter_map(Person::batch_stamp)
            .max()
            .unwrap_or(0);
        debug!("loaded {} people", people.len());

        Self {
            store,
            people,
            last_stamp,
        }
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    pub fn stats(&self) -> Stats {
        Stats::compute(&self.people)
    }

    /// Stamp for a new import batch: the current time in milliseconds, forced
    /// past every stamp already handed out or present in the set.
    pub fn next_batch_stamp(&mut self) -> i64 {
        let stamp = Utc::now().timestamp_millis().max(self.last_stamp + 1);
        self.last_stamp = stamp;
        stamp
    }

    /// Append `batch` after the existing people, preserving both orders.
    pub fn append(&mut self, batch: Vec<Person>) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut next = Vec::with_capacity(self.people.len() + batch.len());
        next.extend_from_slice(&self.people);
        next.extend(batch);
        self.commit(next)
    }

    /// Flip `is_completed` on the person with `id`. Returns `false` for an unknown id.
    pub fn toggle_completion(&mut self, id: &str) -> Result<bool, StoreError> {
        let Some(idx) = self.people.iter().position(|p| p.id == id) else {
            return Ok(false);
        };
        let mut next = self.people.clone();
        next[idx].is_completed = !next[idx].is_completed;
        self.commit(next)?;
        Ok(true)
    }

    /// Remove everyone. Clearing an empty set is a no-op.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        if self.people.is_empty() {
            return Ok(());
        }
        self.commit(Vec::new())
    }

    fn commit(&mut self, next: Vec<Person>) -> Result<(), StoreError> {
        let blob = serde_json::to_vec(&next)?;
        if let Err(e) = self.store.save(&blob) {
            warn!("persist failed, keeping previous working set: {:#}", e);
            return Err(StoreError::Backend(e));
        }
        self.people = next;
        Ok(())
    }
}
