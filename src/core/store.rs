//! Record collection shared by the command layer and the batch processor.
//!
//! Every mutation is keyed by [`RecordId`] and touches only that record, so
//! completions arriving in any order never clobber unrelated records. The
//! lock is never held across an `.await`.

use parking_lot::RwLock;
use crate::core::{ImageRecord, ImageStatus, RecordId, RecordSnapshot, UploadedFile};
use crate::utils::{StudioError, StudioResult};

#[derive(Debug, Default)]
pub struct RecordStore {
    records: RwLock<Vec<ImageRecord>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends records in order, returning their snapshots
    pub fn insert_many(&self, new_records: Vec<ImageRecord>) -> Vec<RecordSnapshot> {
        let snapshots = new_records.iter().map(ImageRecord::snapshot).collect();
        self.records.write().extend(new_records);
        snapshots
    }

    /// Applies `f` to the record with `id` only.
    pub fn update<F, R>(&self, id: &RecordId, f: F) -> StudioResult<R>
    where
        F: FnOnce(&mut ImageRecord) -> R,
    {
        let mut records = self.records.write();
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| StudioError::not_found(id))?;
        Ok(f(record))
    }

    /// Reads the record with `id`.
    pub fn with_record<F, R>(&self, id: &RecordId, f: F) -> StudioResult<R>
    where
        F: FnOnce(&ImageRecord) -> R,
    {
        let records = self.records.read();
        let record = records
            .iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| StudioError::not_found(id))?;
        Ok(f(record))
    }

    /// Moves every `Idle` record to `Processing` in one step and returns what
    /// each call needs. A record can be claimed at most once.
    pub fn claim_idle(&self) -> Vec<(RecordId, UploadedFile)> {
        let mut records = self.records.write();
        records
            .iter_mut()
            .filter(|r| r.status() == ImageStatus::Idle)
            .filter_map(|r| {
                r.begin_processing().ok()?;
                Some((r.id().clone(), r.original().clone()))
            })
            .collect()
    }

    pub fn snapshot(&self) -> Vec<RecordSnapshot> {
        self.records.read().iter().map(ImageRecord::snapshot).collect()
    }

    pub fn count_by_status(&self, status: ImageStatus) -> usize {
        self.records.read().iter().filter(|r| r.status() == status).count()
    }

    pub fn idle_count(&self) -> usize {
        self.count_by_status(ImageStatus::Idle)
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Removes and drops every record, releasing their previews. Returns how many were removed.
    pub fn drain(&self) -> usize {
        let removed = std::mem::take(&mut *self.records.write());
        let count = removed.len();
        drop(removed);
        count
    }
}
