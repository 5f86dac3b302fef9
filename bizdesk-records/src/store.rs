//! Record persistence: one JSON array per entity under its plural key.

use std::collections::HashSet;

use async_trait::async_trait;
use bizdesk_fields::WithSkipped;
use bizdesk_store::Storage;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::record::Record;

/// Records as loaded, plus the stored entries that were skipped.
///
/// Skipped entries are kept verbatim so a save writes them back.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecords<R> {
    pub records: Vec<R>,
    pub skipped: Vec<Value>,
}

impl<R> Default for StoredRecords<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Load and save whole record collections.
///
/// Implemented for every [`Storage`].
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All persisted records of type `R`, or none.
    ///
    /// Like field layouts, record loads never fail: unreadable or malformed
    /// data loads as empty, and individual bad records are skipped.
    async fn load_records<R: Record>(&self) -> Vec<R> {
        self.load_stored::<R>().await.records
    }

    /// Like [`RecordStore::load_records`], also returning skipped entries.
    async fn load_stored<R: Record>(&self) -> StoredRecords<R>;

    /// Replace every persisted record of type `R`.
    async fn save_records<R: Record>(&self, records: &[R]) -> Result<()> {
        self.save_stored(records, &[]).await
    }

    /// Replace every persisted record of type `R`, writing `skipped` back
    /// after `records`.
    async fn save_stored<R: Record>(&self, records: &[R], skipped: &[Value]) -> Result<()>;

    /// Whether anything has been saved for `R` yet.
    async fn has_records<R: Record>(&self) -> bool;
}

#[async_trait]
impl<S: Storage + ?Sized> RecordStore for S {
    async fn load_stored<R: Record>(&self) -> StoredRecords<R> {
        let key = R::ENTITY.key();
        match self.read(key).await {
            Ok(Some(content)) => parse_records(key, &content),
            Ok(None) => StoredRecords::default(),
            Err(e) => {
                warn!(%key, %e, "could not read records, treating as empty");
                StoredRecords::default()
            }
        }
    }

    async fn save_stored<R: Record>(&self, records: &[R], skipped: &[Value]) -> Result<()> {
        let key = R::ENTITY.key();
        let json = serde_json::to_string(&WithSkipped::new(records, skipped))?;
        self.write(key, &json).await?;
        debug!(
            %key,
            records = records.len(),
            skipped = skipped.len(),
            "saved records"
        );
        Ok(())
    }

    async fn has_records<R: Record>(&self) -> bool {
        matches!(self.read(R::ENTITY.key()).await, Ok(Some(_)))
    }
}

fn parse_records<R: Record>(key: &str, content: &str) -> StoredRecords<R> {
    let items: Vec<Value> = match serde_json::from_str(content) {
        Ok(items) => items,
        Err(e) => {
            warn!(%key, %e, "malformed records, treating as empty");
            return StoredRecords::default();
        }
    };

    let mut seen = HashSet::new();
    let mut stored = StoredRecords {
        records: Vec::with_capacity(items.len()),
        skipped: Vec::new(),
    };
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<R>(item.clone()) {
            Ok(record) if seen.insert(record.id()) => stored.records.push(record),
            Ok(record) => {
                warn!(%key, id = record.id(), "skipping duplicate record id");
                stored.skipped.push(item);
            }
            Err(e) => {
                warn!(%key, index, %e, "skipping invalid record");
                stored.skipped.push(item);
            }
        }
    }
    stored
}
