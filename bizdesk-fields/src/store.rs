//! Field definition store: per-entity layouts on top of keyed storage.
//!
//! Each entity's layout is one JSON array under `"<entity>_custom_fields"`.
//! Saving replaces the whole array in a single storage write.

use std::collections::HashSet;

use async_trait::async_trait;
use bizdesk_store::Storage;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::logging::Pretty;
use crate::types::{EntityType, FieldDef};

/// A layout as loaded, plus the stored entries that were skipped.
///
/// Skipped entries (unreadable or with a duplicate id) are kept verbatim and
/// written back after the fields, so a later save never drops them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredLayout {
    pub fields: Vec<FieldDef>,
    pub skipped: Vec<Value>,
}

/// Durable, ordered storage of field definitions per entity type.
///
/// Implemented for every [`Storage`], so a `FileStorage` or `MemoryStorage`
/// can be handed straight to a [`crate::LayoutBuilder`].
#[async_trait]
pub trait FieldStore: Send + Sync {
    /// The persisted layout for `entity`, or an empty one.
    ///
    /// Never fails: missing data, unreadable storage and malformed JSON all
    /// produce an empty (or partially recovered) layout and a warning.
    async fn load_fields(&self, entity: EntityType) -> Vec<FieldDef> {
        self.load_layout(entity).await.fields
    }

    /// Like [`FieldStore::load_fields`], also returning skipped entries.
    async fn load_layout(&self, entity: EntityType) -> StoredLayout;

    /// Replace the persisted layout for `entity`.
    ///
    /// Entries skipped by the last load are lost; editors should use
    /// [`FieldStore::save_layout`].
    async fn save_fields(&self, entity: EntityType, fields: &[FieldDef]) -> Result<()> {
        self.save_layout(entity, fields, &[]).await
    }

    /// Replace the persisted layout, writing `skipped` back after `fields`.
    async fn save_layout(
        &self,
        entity: EntityType,
        fields: &[FieldDef],
        skipped: &[Value],
    ) -> Result<()>;
}

#[async_trait]
impl<S: Storage + ?Sized> FieldStore for S {
    async fn load_layout(&self, entity: EntityType) -> StoredLayout {
        let key = entity.custom_fields_key();
        let content = match self.read(&key).await {
            Ok(Some(content)) => content,
            Ok(None) => return StoredLayout::default(),
            Err(e) => {
                warn!(%key, %e, "could not read field layout, treating as empty");
                return StoredLayout::default();
            }
        };
        parse_layout(&key, &content)
    }

    async fn save_layout(
        &self,
        entity: EntityType,
        fields: &[FieldDef],
        skipped: &[Value],
    ) -> Result<()> {
        let key = entity.custom_fields_key();
        let json = serde_json::to_string(&WithSkipped::new(fields, skipped))?;
        self.write(&key, &json).await?;
        debug!(
            %key,
            fields = fields.len(),
            skipped = skipped.len(),
            "saved field layout: {}",
            Pretty(fields)
        );
        Ok(())
    }
}

/// Serializes `items` followed by `skipped` as one JSON array.
pub struct WithSkipped<'a, T> {
    items: &'a [T],
    skipped: &'a [Value],
}

impl<'a, T> WithSkipped<'a, T> {
    pub fn new(items: &'a [T], skipped: &'a [Value]) -> Self {
        Self { items, skipped }
    }
}

impl<T: Serialize> Serialize for WithSkipped<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len() + self.skipped.len()))?;
        for item in self.items {
            seq.serialize_element(item)?;
        }
        for raw in self.skipped {
            seq.serialize_element(raw)?;
        }
        seq.end()
    }
}

/// Parse a stored layout, setting aside entries that do not describe a field.
///
/// Duplicate ids keep their first occurrence so the id-uniqueness invariant
/// holds for everything downstream. A value that is not a JSON array at all
/// loads as empty with nothing set aside.
pub fn parse_layout(key: &str, content: &str) -> StoredLayout {
    let items: Vec<Value> = match serde_json::from_str(content) {
        Ok(items) => items,
        Err(e) => {
            warn!(%key, %e, "malformed field layout, treating as empty");
            return StoredLayout::default();
        }
    };

    let mut seen = HashSet::new();
    let mut layout = StoredLayout::default();
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<FieldDef>(item.clone()) {
            Ok(mut def) => {
                if !seen.insert(def.id.clone()) {
                    warn!(%key, id = %def.id, "skipping duplicate field id");
                    layout.skipped.push(item);
                    continue;
                }
                def.normalize();
                layout.fields.push(def);
            }
            Err(e) => {
                warn!(%key, index, %e, "skipping invalid field definition");
                layout.skipped.push(item);
            }
        }
    }
    layout
}
