//! Custom field layouts for bizdesk entities
//!
//! `bizdesk-fields` owns the per-entity schema of user-defined attributes: an
//! ordered list of [`FieldDef`]s for each of Leads, Contacts, Accounts,
//! Opportunities and Activities. It knows nothing about the records that carry
//! the values; records reference fields only by id.
//!
//! # Architecture
//!
//! - **Schema-only**: owns field definitions, not field values
//! - **One key per entity**: each layout is a JSON array stored under
//!   `"<entity>_custom_fields"` in any [`bizdesk_store::Storage`]
//! - **Lenient reads**: missing or malformed layouts load as empty, corrupt
//!   values render as empty; only a failed write is an error
//! - **Editor as a state machine**: [`LayoutBuilder`] drives add/edit/remove/
//!   reorder and writes through to the store after every committed change

pub mod error;
pub mod layout;
pub mod logging;
pub mod render;
pub mod store;
pub mod types;

pub use error::{FieldsError, Result};
pub use layout::{reorder, CommitOutcome, Draft, LayoutBuilder, Session};
pub use logging::Pretty;
pub use render::{
    render_custom, render_field, AttributeLookup, Control, FieldValue, RenderedField,
};
pub use store::{FieldStore, StoredLayout, WithSkipped};
pub use types::{Editor, EntityType, FieldDef, FieldKind};
