//! `bizdesk fields` - manage custom field layouts.

use anyhow::{bail, Context, Result};
use bizdesk_fields::{CommitOutcome, EntityType, FieldDef, FieldKind};
use comfy_table::Table;

use crate::cli::FieldsCommand;
use crate::context::Workspace;

pub async fn run(ws: &Workspace, cmd: FieldsCommand) -> Result<()> {
    match cmd {
        FieldsCommand::List { entity, json } => list(ws, entity.into(), json).await,
        FieldsCommand::Add {
            entity,
            label,
            kind,
            options,
        } => add(ws, entity.into(), &label, kind.into(), &options).await,
        FieldsCommand::Edit {
            entity,
            id,
            label,
            kind,
            options,
        } => {
            edit(
                ws,
                entity.into(),
                &id,
                label.as_deref(),
                kind.map(Into::into),
                &options,
            )
            .await
        }
        FieldsCommand::Remove { entity, id } => remove(ws, entity.into(), &id).await,
        FieldsCommand::Move { entity, id, over } => move_field(ws, entity.into(), &id, &over).await,
    }
}

async fn list(ws: &Workspace, entity: EntityType, json: bool) -> Result<()> {
    let fields = ws.layout(entity).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&fields)?);
    } else if fields.is_empty() {
        println!("No custom fields defined for {entity}.");
    } else {
        println!("{}", fields_table(ws.table(), &fields));
    }
    Ok(())
}

pub fn fields_table(mut table: Table, fields: &[FieldDef]) -> Table {
    table.set_header(vec!["#", "ID", "Label", "Type", "Options"]);
    for (i, field) in fields.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            field.id.clone(),
            field.label.clone(),
            field.kind.to_string(),
            field.options.join(", "),
        ]);
    }
    table
}

async fn add(
    ws: &Workspace,
    entity: EntityType,
    label: &str,
    kind: FieldKind,
    options: &[String],
) -> Result<()> {
    if kind != FieldKind::Select && !options.is_empty() {
        bail!("--option only applies to select fields");
    }

    let mut builder = ws.builder(entity).await;
    builder.begin_add()?;
    builder.set_label(label)?;
    builder.set_kind(kind)?;
    for option in options {
        builder.add_option(option)?;
    }

    match builder.commit().await.context("failed to save field layout")? {
        CommitOutcome::Committed(field) => {
            println!("Added {} field '{}' ({}) to {entity}", field.kind, field.label, field.id);
            Ok(())
        }
        CommitOutcome::Rejected => bail!("field label must not be empty"),
    }
}

async fn edit(
    ws: &Workspace,
    entity: EntityType,
    id: &str,
    label: Option<&str>,
    kind: Option<FieldKind>,
    options: &[String],
) -> Result<()> {
    let mut builder = ws.builder(entity).await;
    builder.begin_edit(id)?;
    if let Some(label) = label {
        builder.set_label(label)?;
    }
    if let Some(kind) = kind {
        builder.set_kind(kind)?;
    }
    if !options.is_empty() {
        let is_select = builder.draft().is_some_and(|d| d.kind == FieldKind::Select);
        if !is_select {
            bail!("--option only applies to select fields");
        }
        for option in options {
            builder.add_option(option)?;
        }
    }

    match builder.commit().await.context("failed to save field layout")? {
        CommitOutcome::Committed(field) => {
            println!("Updated field '{}' ({})", field.label, field.id);
            Ok(())
        }
        CommitOutcome::Rejected => bail!("field label must not be empty"),
    }
}

async fn remove(ws: &Workspace, entity: EntityType, id: &str) -> Result<()> {
    let mut builder = ws.builder(entity).await;
    let removed = builder
        .remove(id)
        .await
        .context("failed to remove field")?;
    println!(
        "Removed field '{}' from {entity}; values already stored on records are kept",
        removed.label
    );
    Ok(())
}

async fn move_field(ws: &Workspace, entity: EntityType, id: &str, over: &str) -> Result<()> {
    let mut builder = ws.builder(entity).await;
    builder
        .move_field(id, over)
        .await
        .context("failed to reorder fields")?;
    let order: Vec<_> = builder.fields().iter().map(|f| f.label.as_str()).collect();
    println!("{entity} fields: {}", order.join(", "));
    Ok(())
}
