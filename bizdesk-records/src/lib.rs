//! CRM records for bizdesk
//!
//! Records have fixed, entity-specific fields plus a `custom` map holding the
//! values of user-defined fields (see `bizdesk-fields`). The map references
//! field definitions by id only, so layouts can change without touching
//! record data.
//!
//! - [`Record`] is implemented by [`Lead`], [`Contact`], [`Account`],
//!   [`Opportunity`] and [`Activity`]
//! - [`set_attribute`] updates a single custom value copy-on-write
//! - [`RecordStore`] persists each entity as one JSON array in any
//!   [`bizdesk_store::Storage`]
//! - [`calendar`] and [`pipeline`] are the activity and opportunity boards

pub mod attributes;
pub mod calendar;
pub mod collection;
pub mod entities;
pub mod error;
pub mod journal;
pub mod pipeline;
pub mod record;
pub mod sample;
pub mod store;

pub use attributes::{clear_attribute, orphaned_attributes, set_attribute, CustomAttributes};
pub use calendar::{calendar, day_key, CalendarReason};
pub use collection::RecordCollection;
pub use entities::{Account, Activity, Contact, Lead, Opportunity};
pub use error::{RecordsError, Result};
pub use journal::{Attachment, Journal, Note, TimelineEntry};
pub use pipeline::{pipeline, StageColumn, STAGES};
pub use record::{Record, SortValue};
pub use store::{RecordStore, StoredRecords};
