//! Shared state for command handlers.

use std::sync::Arc;

use bizdesk_fields::{EntityType, FieldDef, FieldStore, LayoutBuilder};
use bizdesk_store::FileStorage;
use comfy_table::Table;

use crate::config::BizdeskConfig;
use crate::table::new_table;

/// Run `$body` with `$r` bound to the record type for `$entity`.
macro_rules! with_record_type {
    ($entity:expr, $r:ident => $body:expr) => {
        match $entity {
            ::bizdesk_fields::EntityType::Lead => {
                type $r = ::bizdesk_records::Lead;
                $body
            }
            ::bizdesk_fields::EntityType::Contact => {
                type $r = ::bizdesk_records::Contact;
                $body
            }
            ::bizdesk_fields::EntityType::Account => {
                type $r = ::bizdesk_records::Account;
                $body
            }
            ::bizdesk_fields::EntityType::Opportunity => {
                type $r = ::bizdesk_records::Opportunity;
                $body
            }
            ::bizdesk_fields::EntityType::Activity => {
                type $r = ::bizdesk_records::Activity;
                $body
            }
        }
    };
}
pub(crate) use with_record_type;

/// Configuration plus the storage it points at.
pub struct Workspace {
    pub config: BizdeskConfig,
    pub storage: Arc<FileStorage>,
}

impl Workspace {
    pub fn open(config: BizdeskConfig) -> Self {
        let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
        Self { config, storage }
    }

    /// The current field layout for `entity`.
    pub async fn layout(&self, entity: EntityType) -> Vec<FieldDef> {
        self.storage.load_fields(entity).await
    }

    /// Open a layout editing session for `entity`.
    pub async fn builder(&self, entity: EntityType) -> LayoutBuilder<FileStorage> {
        LayoutBuilder::open(entity, self.storage.clone()).await
    }

    pub fn table(&self) -> Table {
        new_table(self.config.table_width)
    }
}

/// Find a custom field by id, or by label ignoring case.
pub fn find_field<'a>(defs: &'a [FieldDef], key: &str) -> Option<&'a FieldDef> {
    defs.iter()
        .find(|d| d.id == key)
        .or_else(|| defs.iter().find(|d| d.label.eq_ignore_ascii_case(key.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizdesk_fields::FieldKind;

    #[test]
    fn find_field_by_id_then_label() {
        let defs = vec![
            FieldDef::new("Tier", FieldKind::Text).with_id("f1"),
            FieldDef::new("f1", FieldKind::Text).with_id("f2"),
        ];
        assert_eq!(find_field(&defs, "f1").unwrap().id, "f1");
        assert_eq!(find_field(&defs, "tier").unwrap().id, "f1");
        assert!(find_field(&defs, "missing").is_none());
    }
}
