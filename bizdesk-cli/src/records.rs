//! `bizdesk records` - browse and edit records.

use anyhow::{anyhow, bail, Context, Result};
use bizdesk_fields::{render_custom, EntityType, FieldDef, FieldValue, RenderedField};
use bizdesk_query::{Direction, ListQuery, SortMode};
use bizdesk_records::{orphaned_attributes, Record, RecordCollection, RecordsError, TimelineEntry};
use comfy_table::Table;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cli::{ListArgs, RecordsCommand};
use crate::context::{find_field, with_record_type, Workspace};

pub async fn run(ws: &Workspace, cmd: RecordsCommand) -> Result<()> {
    match cmd {
        RecordsCommand::List { entity, args } => {
            with_record_type!(EntityType::from(entity), R => list::<R>(ws, &args).await)
        }
        RecordsCommand::Show { entity, id, json } => {
            with_record_type!(EntityType::from(entity), R => show::<R>(ws, id, json).await)
        }
        RecordsCommand::Add { entity, values } => {
            with_record_type!(EntityType::from(entity), R => add::<R>(ws, &values).await)
        }
        RecordsCommand::Set {
            entity,
            id,
            field,
            value,
        } => with_record_type!(EntityType::from(entity), R => set::<R>(ws, id, &field, &value).await),
        RecordsCommand::Unset { entity, id, field } => {
            with_record_type!(EntityType::from(entity), R => unset::<R>(ws, id, &field).await)
        }
        RecordsCommand::Note { entity, id, text } => {
            with_record_type!(EntityType::from(entity), R => note::<R>(ws, id, &text).await)
        }
        RecordsCommand::Attach {
            entity,
            id,
            filename,
        } => with_record_type!(EntityType::from(entity), R => attach::<R>(ws, id, &filename).await),
        RecordsCommand::Delete { entity, id } => {
            with_record_type!(EntityType::from(entity), R => delete::<R>(ws, id).await)
        }
    }
}

/// Build the list query for `args`.
pub fn list_query(args: &ListArgs, mode: SortMode) -> ListQuery {
    let direction = if args.desc {
        Direction::Descending
    } else {
        Direction::Ascending
    };
    let mut query = ListQuery::new()
        .with_search(args.search.clone().unwrap_or_default())
        .with_owner(args.owner.clone().unwrap_or_default())
        .with_mode(mode);
    query.direction = direction;
    query.sort_key = args.sort.clone();
    query
}

async fn load<R: Record>(ws: &Workspace) -> RecordCollection<R> {
    RecordCollection::load(ws.storage.as_ref()).await
}

async fn list<R: Record>(ws: &Workspace, args: &ListArgs) -> Result<()> {
    let records = load::<R>(ws).await;
    let defs = ws.layout(R::ENTITY).await;
    let view = list_query(args, ws.config.sort_mode()).apply(records.records());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else if view.is_empty() {
        println!("No {} found.", R::ENTITY);
    } else {
        println!("{}", records_table(ws.table(), &view, &defs));
    }
    Ok(())
}

/// One row per record: id, fixed fields, then custom fields in layout order.
pub fn records_table<R: Record>(mut table: Table, records: &[&R], defs: &[FieldDef]) -> Table {
    let mut header = vec!["ID".to_string()];
    header.extend(R::FIELDS.iter().map(|f| capitalize(f)));
    header.extend(defs.iter().map(|d| d.label.clone()));
    table.set_header(header);

    for record in records {
        let mut row = vec![record.id().to_string()];
        row.extend(record.fixed_fields().into_iter().map(|(_, v)| v));
        row.extend(
            render_custom(defs, record.custom())
                .into_iter()
                .map(|r| r.display),
        );
        table.add_row(row);
    }
    table
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Serialize)]
struct RecordDetail<'a, R> {
    record: &'a R,
    custom: &'a [RenderedField],
    timeline: Vec<TimelineEntry<'a>>,
}

async fn show<R: Record>(ws: &Workspace, id: u64, as_json: bool) -> Result<()> {
    let records = load::<R>(ws).await;
    let record = records
        .get(id)
        .ok_or_else(|| RecordsError::not_found(R::ENTITY, id))?;
    let defs = ws.layout(R::ENTITY).await;
    let custom = render_custom(&defs, record.custom());

    let orphans = orphaned_attributes(record, &defs);
    if !orphans.is_empty() {
        debug!(?orphans, "values for removed fields not shown");
    }

    if as_json {
        let out = RecordDetail {
            record,
            custom: &custom,
            timeline: record.journal().timeline(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", detail_table(ws.table(), record, &custom));
    let timeline = record.journal().timeline();
    if !timeline.is_empty() {
        println!("\nTimeline:");
        for entry in timeline {
            println!("  {}  {:<10}  {}", entry.date(), entry.kind(), entry.summary());
        }
    }
    Ok(())
}

/// Two-column table of a record's fixed and custom fields.
pub fn detail_table<R: Record>(mut table: Table, record: &R, custom: &[RenderedField]) -> Table {
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["ID".to_string(), record.id().to_string()]);
    for (name, value) in record.fixed_fields() {
        table.add_row(vec![capitalize(name), value]);
    }
    for field in custom {
        table.add_row(vec![field.label.clone(), field.display.clone()]);
    }
    table
}

/// Split `name=value`.
fn parse_pair(pair: &str) -> Result<(&str, &str)> {
    pair.split_once('=')
        .map(|(k, v)| (k.trim(), v.trim()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| anyhow!("expected NAME=VALUE, got '{pair}'"))
}

async fn add<R: Record>(ws: &Workspace, values: &[String]) -> Result<()> {
    let defs = ws.layout(R::ENTITY).await;
    let mut record = R::default();
    for pair in values {
        let (name, value) = parse_pair(pair)?;
        if R::FIELDS.iter().any(|f| *f == name) {
            record.set_field(name, value)?;
        } else if let Some(def) = find_field(&defs, name) {
            record.custom_mut().insert(def.id.clone(), value);
        } else {
            bail!("{} has no field '{name}'", R::ENTITY);
        }
    }

    let mut records = load::<R>(ws).await;
    let id = records.insert(record);
    records
        .save(ws.storage.as_ref())
        .await
        .context("failed to save records")?;
    println!("Added {} {id}", R::ENTITY.singular());
    Ok(())
}

async fn set<R: Record>(ws: &Workspace, id: u64, field: &str, value: &str) -> Result<()> {
    let defs = ws.layout(R::ENTITY).await;
    let def = find_field(&defs, field)
        .ok_or_else(|| anyhow!("{} has no custom field '{field}'", R::ENTITY))?;

    if !value.is_empty() && FieldValue::coerce(def, Some(value)).is_empty() {
        warn!(
            field = %def.label,
            kind = %def.kind,
            %value,
            "value does not fit the field type and will display as empty"
        );
    }

    let mut records = load::<R>(ws).await;
    records.set_attribute(id, &def.id, value)?;
    records
        .save(ws.storage.as_ref())
        .await
        .context("failed to save records")?;
    println!("Set '{}' on {} {id}", def.label, R::ENTITY.singular());
    Ok(())
}

async fn unset<R: Record>(ws: &Workspace, id: u64, field: &str) -> Result<()> {
    let defs = ws.layout(R::ENTITY).await;
    let field_id = find_field(&defs, field).map_or(field, |d| d.id.as_str());

    let mut records = load::<R>(ws).await;
    records.clear_attribute(id, field_id)?;
    records
        .save(ws.storage.as_ref())
        .await
        .context("failed to save records")?;
    println!("Cleared '{field}' on {} {id}", R::ENTITY.singular());
    Ok(())
}

async fn note<R: Record>(ws: &Workspace, id: u64, text: &str) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    update_journal::<R>(ws, id, |record| {
        record.journal_mut().add_note(text, today).is_some()
    })
    .await?;
    println!("Added note to {} {id}", R::ENTITY.singular());
    Ok(())
}

async fn attach<R: Record>(ws: &Workspace, id: u64, filename: &str) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    update_journal::<R>(ws, id, |record| {
        record.journal_mut().add_attachment(filename, today).is_some()
    })
    .await?;
    println!("Attached '{filename}' to {} {id}", R::ENTITY.singular());
    Ok(())
}

async fn update_journal<R: Record>(
    ws: &Workspace,
    id: u64,
    change: impl FnOnce(&mut R) -> bool,
) -> Result<()> {
    let mut records = load::<R>(ws).await;
    let mut record = records
        .get(id)
        .cloned()
        .ok_or_else(|| RecordsError::not_found(R::ENTITY, id))?;
    if !change(&mut record) {
        bail!("nothing to add: text must not be empty");
    }
    records.update(record)?;
    records
        .save(ws.storage.as_ref())
        .await
        .context("failed to save records")?;
    Ok(())
}

async fn delete<R: Record>(ws: &Workspace, id: u64) -> Result<()> {
    let mut records = load::<R>(ws).await;
    let removed = records.remove(id)?;
    records
        .save(ws.storage.as_ref())
        .await
        .context("failed to save records")?;
    println!("Deleted {} {id} ({})", R::ENTITY.singular(), removed.title());
    Ok(())
}
