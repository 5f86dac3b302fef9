//! Keyed durable storage for bizdesk
//!
//! Every piece of persisted state in bizdesk lives under a single string key:
//! one key per entity type for custom field layouts (`"leads_custom_fields"`)
//! and one key per entity type for the records themselves (`"activities"`).
//! Values are opaque text (JSON in practice); this crate knows nothing about
//! their shape.
//!
//! # Backends
//!
//! - [`FileStorage`]: one `<key>.json` file per key under a root directory,
//!   written via temp file + rename so readers never see a partial value
//! - [`MemoryStorage`]: a process-local map, used as the test double and for
//!   throwaway sessions
//!
//! ```rust,no_run
//! use bizdesk_store::{FileStorage, Storage};
//!
//! # async fn example() -> bizdesk_store::Result<()> {
//! let storage = FileStorage::new("/tmp/bizdesk");
//! storage.write("activities", "[]").await?;
//! assert_eq!(storage.read("activities").await?.as_deref(), Some("[]"));
//! # Ok(())
//! # }
//! ```

mod error;
mod file;
mod memory;

pub use error::{Result, StoreError};
pub use file::FileStorage;
pub use memory::MemoryStorage;

use async_trait::async_trait;

/// Durable key/value storage.
///
/// A `write` replaces the whole value for a key; there is no partial update.
/// Readers always observe either the previous value or the new one.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing was written yet.
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    async fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Returns `false` if it did not exist.
    async fn remove(&self, key: &str) -> Result<bool>;

    /// All keys currently stored, sorted.
    async fn keys(&self) -> Result<Vec<String>>;
}

/// Check that a key is usable as a storage key.
///
/// Keys double as file stems for [`FileStorage`], so they must not be empty,
/// contain path separators, or start with a dot.
pub fn validate_key(key: &str) -> Result<()> {
    let bad = key.is_empty()
        || key.starts_with('.')
        || key.contains(['/', '\\'])
        || key.contains('\0');
    if bad {
        return Err(StoreError::InvalidKey {
            key: key.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_keys() {
        assert!(validate_key("leads_custom_fields").is_ok());
        assert!(validate_key("activities").is_ok());
    }

    #[test]
    fn rejects_path_like_keys() {
        for key in ["", ".hidden", "../etc", "a/b", "a\\b"] {
            assert!(validate_key(key).is_err(), "{key:?} should be rejected");
        }
    }
}
