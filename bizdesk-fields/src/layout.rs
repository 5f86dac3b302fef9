//! Layout builder: the editing session for one entity's custom fields.
//!
//! A session is either idle or composing a single draft:
//!
//! ```text
//! Idle ──begin_add / begin_edit──▶ Composing ──commit (label set)──▶ Idle  (store write)
//!   ▲                                  │
//!   └──────────── cancel ──────────────┘                                  (no write)
//! Idle ──remove / reorder / move_field──▶ Idle                            (store write)
//! ```
//!
//! Every committed change is written through to the [`FieldStore`] before the
//! in-memory layout is updated. If the write fails the layout and any draft
//! are left exactly as they were.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{FieldsError, Result};
use crate::store::{FieldStore, StoredLayout};
use crate::types::{new_field_id, EntityType, FieldDef, FieldKind};

/// Move the element at `from` to position `to`, shifting the rest.
///
/// Out-of-range indexes leave the sequence unchanged.
pub fn reorder<T: Clone>(seq: &[T], from: usize, to: usize) -> Vec<T> {
    let mut out = seq.to_vec();
    if from >= out.len() || to >= out.len() || from == to {
        return out;
    }
    let item = out.remove(from);
    out.insert(to, item);
    out
}

/// An unsaved field: either a new one or an edit of an existing id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Draft {
    /// Id of the field being edited, `None` for a new field.
    pub editing: Option<String>,
    pub label: String,
    pub kind: FieldKind,
    pub options: Vec<String>,
}

impl Draft {
    fn blank() -> Self {
        Self {
            editing: None,
            label: String::new(),
            kind: FieldKind::Text,
            options: Vec::new(),
        }
    }

    fn from_field(field: &FieldDef) -> Self {
        Self {
            editing: Some(field.id.clone()),
            label: field.label.clone(),
            kind: field.kind,
            options: field.options.clone(),
        }
    }

    fn to_field(&self) -> FieldDef {
        FieldDef {
            id: self.editing.clone().unwrap_or_else(new_field_id),
            label: self.label.trim().to_string(),
            kind: self.kind,
            options: if self.kind == FieldKind::Select {
                self.options.clone()
            } else {
                Vec::new()
            },
        }
    }
}

/// Editing session state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    #[default]
    Idle,
    Composing(Draft),
}

impl Session {
    fn name(&self) -> &'static str {
        match self {
            Session::Idle => "idle",
            Session::Composing(_) => "composing",
        }
    }
}

/// Result of trying to commit a draft.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// The draft was written; the field as stored.
    Committed(FieldDef),
    /// The draft had a blank label. Nothing was written; still composing.
    Rejected,
}

/// Interactive editor for one entity's field layout.
pub struct LayoutBuilder<S: FieldStore + ?Sized> {
    entity: EntityType,
    fields: Vec<FieldDef>,
    /// Stored entries that did not load as fields, written back untouched.
    skipped: Vec<Value>,
    store: Arc<S>,
    session: Session,
}

impl<S: FieldStore + ?Sized> LayoutBuilder<S> {
    /// Open a session on the layout currently persisted for `entity`.
    pub async fn open(entity: EntityType, store: Arc<S>) -> Self {
        let StoredLayout { fields, skipped } = store.load_layout(entity).await;
        debug!(
            %entity,
            fields = fields.len(),
            skipped = skipped.len(),
            "layout builder opened"
        );
        Self {
            entity,
            fields,
            skipped,
            store,
            session: Session::Idle,
        }
    }

    pub fn entity(&self) -> EntityType {
        self.entity
    }

    /// The current layout, in presentation order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The draft being composed, if any.
    pub fn draft(&self) -> Option<&Draft> {
        match &self.session {
            Session::Composing(d) => Some(d),
            Session::Idle => None,
        }
    }

    pub fn get(&self, id: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.id == id)
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.fields
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| FieldsError::FieldNotFound { id: id.to_string() })
    }

    fn require_idle(&self, action: &'static str) -> Result<()> {
        match self.session {
            Session::Idle => Ok(()),
            _ => Err(FieldsError::invalid_state(action, self.session.name())),
        }
    }

    fn draft_mut(&mut self, action: &'static str) -> Result<&mut Draft> {
        match &mut self.session {
            Session::Composing(d) => Ok(d),
            Session::Idle => Err(FieldsError::invalid_state(action, "idle")),
        }
    }

    // --- Composing ---

    /// Start composing a new, blank text field.
    pub fn begin_add(&mut self) -> Result<&mut Draft> {
        self.require_idle("add a field")?;
        self.session = Session::Composing(Draft::blank());
        self.draft_mut("add a field")
    }

    /// Start editing an existing field; the draft keeps its id.
    pub fn begin_edit(&mut self, id: &str) -> Result<&mut Draft> {
        self.require_idle("edit a field")?;
        let idx = self.position(id)?;
        self.session = Session::Composing(Draft::from_field(&self.fields[idx]));
        self.draft_mut("edit a field")
    }

    pub fn set_label(&mut self, label: impl Into<String>) -> Result<()> {
        self.draft_mut("set a label")?.label = label.into();
        Ok(())
    }

    /// Change the draft's kind. Switching to `select` starts from no options;
    /// switching away from it drops them.
    pub fn set_kind(&mut self, kind: FieldKind) -> Result<()> {
        let draft = self.draft_mut("set a field type")?;
        if draft.kind != kind {
            draft.options.clear();
        }
        draft.kind = kind;
        Ok(())
    }

    /// Append an option to a select draft. Blank input is ignored; duplicates
    /// are kept.
    pub fn add_option(&mut self, option: &str) -> Result<()> {
        let draft = self.draft_mut("add an option")?;
        let option = option.trim();
        if option.is_empty() || draft.kind != FieldKind::Select {
            return Ok(());
        }
        draft.options.push(option.to_string());
        Ok(())
    }

    /// Discard the draft without writing.
    pub fn cancel(&mut self) {
        self.session = Session::Idle;
    }

    /// Commit the draft: append a new field or replace the edited one in
    /// place, then write the layout.
    pub async fn commit(&mut self) -> Result<CommitOutcome> {
        let Session::Composing(draft) = &self.session else {
            return Err(FieldsError::invalid_state("commit", "idle"));
        };
        if draft.label.trim().is_empty() {
            return Ok(CommitOutcome::Rejected);
        }

        let field = draft.to_field();
        let mut next = self.fields.clone();
        match &draft.editing {
            Some(id) => {
                let idx = self.position(id)?;
                next[idx] = field.clone();
            }
            None => next.push(field.clone()),
        }

        self.persist(next).await?;
        self.session = Session::Idle;
        debug!(entity = %self.entity, id = %field.id, "committed field");
        Ok(CommitOutcome::Committed(field))
    }

    // --- Idle actions ---

    /// Remove a field from the layout. Record values for it are left alone.
    pub async fn remove(&mut self, id: &str) -> Result<FieldDef> {
        self.require_idle("remove a field")?;
        let idx = self.position(id)?;
        let mut next = self.fields.clone();
        let removed = next.remove(idx);
        self.persist(next).await?;
        debug!(entity = %self.entity, %id, "removed field");
        Ok(removed)
    }

    /// Move the field at `from` to `to`.
    pub async fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        self.require_idle("reorder fields")?;
        let next = reorder(&self.fields, from, to);
        if next == self.fields {
            return Ok(());
        }
        self.persist(next).await
    }

    /// Drag-and-drop by id: move `active` to where `over` currently sits.
    pub async fn move_field(&mut self, active: &str, over: &str) -> Result<()> {
        if active == over {
            return Ok(());
        }
        let from = self.position(active)?;
        let to = self.position(over)?;
        self.reorder(from, to).await
    }

    async fn persist(&mut self, next: Vec<FieldDef>) -> Result<()> {
        self.store
            .save_layout(self.entity, &next, &self.skipped)
            .await?;
        self.fields = next;
        Ok(())
    }
}
