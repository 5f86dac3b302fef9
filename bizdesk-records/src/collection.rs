//! An in-memory collection of one entity's records with write-through saves.

use serde_json::Value;
use tracing::debug;

use crate::attributes;
use crate::error::{RecordsError, Result};
use crate::record::{next_free_id, Record};
use crate::store::{RecordStore, StoredRecords};

/// The records of one entity type, in insertion order.
///
/// Stored entries that did not load are carried along and saved back
/// unchanged after the records.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordCollection<R: Record> {
    records: Vec<R>,
    skipped: Vec<Value>,
}

impl<R: Record> Default for RecordCollection<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<R: Record> From<StoredRecords<R>> for RecordCollection<R> {
    fn from(stored: StoredRecords<R>) -> Self {
        Self {
            records: stored.records,
            skipped: stored.skipped,
        }
    }
}

impl<R: Record> RecordCollection<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records,
            skipped: Vec::new(),
        }
    }

    pub async fn load<S: RecordStore + ?Sized>(store: &S) -> Self {
        store.load_stored::<R>().await.into()
    }

    pub async fn save<S: RecordStore + ?Sized>(&self, store: &S) -> Result<()> {
        store.save_stored(&self.records, &self.skipped).await
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    fn position(&self, id: u64) -> Result<usize> {
        self.records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| RecordsError::not_found(R::ENTITY, id))
    }

    /// Stored entries that could not be loaded as records.
    pub fn skipped(&self) -> &[Value] {
        &self.skipped
    }

    /// Next free id: one past the largest in use, counting ids still held by
    /// skipped entries.
    pub fn next_id(&self) -> u64 {
        next_free_id(
            self.records
                .iter()
                .map(Record::id)
                .chain(self.skipped.iter().filter_map(|v| v.get("id")?.as_u64())),
        )
    }

    /// Append `record` under a fresh id and return that id.
    pub fn insert(&mut self, mut record: R) -> u64 {
        let id = self.next_id();
        record.set_id(id);
        self.records.push(record);
        debug!(entity = %R::ENTITY, id, "inserted record");
        id
    }

    /// Replace the record with the same id, keeping its position.
    pub fn update(&mut self, record: R) -> Result<()> {
        let idx = self.position(record.id())?;
        self.records[idx] = record;
        Ok(())
    }

    pub fn remove(&mut self, id: u64) -> Result<R> {
        let idx = self.position(id)?;
        debug!(entity = %R::ENTITY, id, "removed record");
        Ok(self.records.remove(idx))
    }

    /// Set one custom value on the record with `id`.
    pub fn set_attribute(&mut self, id: u64, field_id: &str, value: &str) -> Result<&R> {
        let idx = self.position(id)?;
        self.records[idx] = attributes::set_attribute(&self.records[idx], field_id, value);
        Ok(&self.records[idx])
    }

    /// Remove one custom value from the record with `id`.
    pub fn clear_attribute(&mut self, id: u64, field_id: &str) -> Result<&R> {
        let idx = self.position(id)?;
        self.records[idx] = attributes::clear_attribute(&self.records[idx], field_id);
        Ok(&self.records[idx])
    }
}
