mod repository;

pub use repository::{JsonFileRepository, MemoryRepository, Repository};

use tracing::{debug, warn};

use crate::error::{LedgerError, Result};

/// A record with a store-assigned numeric id.
pub trait Record {
    /// Human name of the record kind, used in not-found errors
    const KIND: &'static str;

    fn id(&self) -> u32;
}

/// In-memory collection for one domain, persisted through a [`Repository`]
/// after every mutation.
///
/// Ids come from a counter owned by the store. The repository records the
/// last id handed out, and the counter resumes one past the larger of that and
/// the highest id loaded, so an id freed by a delete is never handed out again.
pub struct RecordStore<T, R> {
    records: Vec<T>,
    /// `None` once `u32::MAX` has been assigned
    next_id: Option<u32>,
    repo: R,
}

impl<T: Record, R: Repository<T>> RecordStore<T, R> {
    /// Load the stored collection, or fall back to `samples` when nothing
    /// usable is stored.
    pub fn open(repo: R, samples: impl FnOnce() -> Vec<T>) -> Self {
        let records = match repo.load() {
            Ok(Some(records)) if !records.is_empty() => {
                debug!(
                    kind = T::KIND,
                    count = records.len(),
                    location = %repo.location(),
                    "loaded stored records"
                );
                records
            }
            Ok(_) => samples(),
            Err(e) => {
                warn!(
                    kind = T::KIND,
                    location = %repo.location(),
                    error = %e,
                    "failed to load stored records, using built-in data"
                );
                samples()
            }
        };

        let last_issued = match repo.load_last_id() {
            Ok(last) => last.unwrap_or(0),
            Err(e) => {
                warn!(
                    kind = T::KIND,
                    location = %repo.location(),
                    error = %e,
                    "failed to load id counter, resuming from stored records"
                );
                0
            }
        };
        let highest = records.iter().map(Record::id).max().unwrap_or(0);
        let next_id = highest.max(last_issued).checked_add(1);
        Self {
            records,
            next_id,
            repo,
        }
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Same as [`get`](Self::get) but reports a missing record as an error.
    pub fn find(&self, id: u32) -> Result<&T> {
        self.get(id).ok_or(LedgerError::RecordNotFound { kind: T::KIND, id })
    }

    /// The id the next `add` will assign, if any are left
    pub fn next_id(&self) -> Option<u32> {
        self.next_id
    }

    /// Append a record built from the freshly assigned id.
    pub fn add(&mut self, build: impl FnOnce(u32) -> T) -> Result<&T> {
        let id = self
            .next_id
            .ok_or(LedgerError::IdsExhausted { kind: T::KIND })?;
        self.next_id = id.checked_add(1);

        let idx = self.records.len();
        self.records.push(build(id));
        self.persist();
        if let Err(e) = self.repo.save_last_id(id) {
            warn!(kind = T::KIND, id, error = %e, "failed to save id counter");
        }
        Ok(&self.records[idx])
    }

    /// Merge changes into the record with `id`.
    pub fn update<O>(&mut self, id: u32, patch: impl FnOnce(&mut T) -> O) -> Result<O> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(LedgerError::RecordNotFound { kind: T::KIND, id })?;

        let out = patch(record);
        self.persist();
        Ok(out)
    }

    pub fn delete(&mut self, id: u32) -> Result<T> {
        let idx = self
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(LedgerError::RecordNotFound { kind: T::KIND, id })?;

        let removed = self.records.remove(idx);
        self.persist();
        Ok(removed)
    }

    // Write failures never abort the mutation; the in-memory state stays authoritative.
    fn persist(&self) {
        if let Err(e) = self.repo.save(&self.records) {
            warn!(
                kind = T::KIND,
                location = %self.repo.location(),
                error = %e,
                "failed to save records"
            );
        }
    }
}
