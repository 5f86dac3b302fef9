//! `bizdesk calendar` and `bizdesk pipeline`.

use anyhow::{bail, Result};
use bizdesk_records::{
    calendar, day_key, pipeline, Activity, CalendarReason, Opportunity, RecordCollection,
    StageColumn,
};
use comfy_table::Table;

use crate::context::Workspace;
use crate::table::{format_amount, truncate_str};

pub async fn run_calendar(ws: &Workspace, date: Option<&str>) -> Result<()> {
    let day = match date {
        Some(raw) => match day_key(raw) {
            Some(day) if bizdesk_fields::render::parse_date(day).is_some() => Some(day),
            _ => bail!("invalid date '{raw}', expected YYYY-MM-DD"),
        },
        None => None,
    };

    let activities = RecordCollection::<Activity>::load(ws.storage.as_ref()).await;
    let table = calendar_table(ws.table(), activities.records(), day);
    match table {
        Some(table) => println!("{table}"),
        None => match day {
            Some(day) => println!("No activities on {day}."),
            None => println!("No activities scheduled."),
        },
    }
    Ok(())
}

/// One row per activity per day, earliest day first. `None` when empty.
pub fn calendar_table(mut table: Table, activities: &[Activity], day: Option<&str>) -> Option<Table> {
    let days = calendar(activities);
    let mut rows = 0;
    table.set_header(vec!["Day", "", "Type", "Subject", "Owner"]);
    for (key, entries) in &days {
        if day.is_some_and(|d| d != key.as_str()) {
            continue;
        }
        for (activity, reason) in entries {
            let marker = match reason {
                CalendarReason::Due => "due",
                CalendarReason::Reminder => "reminder",
            };
            table.add_row(vec![
                key.clone(),
                marker.to_string(),
                activity.kind.clone(),
                activity.subject.clone(),
                activity.owner.clone(),
            ]);
            rows += 1;
        }
    }
    (rows > 0).then_some(table)
}

pub async fn run_pipeline(ws: &Workspace, json: bool) -> Result<()> {
    let opportunities = RecordCollection::<Opportunity>::load(ws.storage.as_ref()).await;
    let board = pipeline(opportunities.records());
    if json {
        println!("{}", serde_json::to_string_pretty(&board)?);
    } else {
        println!("{}", pipeline_table(ws.table(), &board));
    }
    Ok(())
}

pub fn pipeline_table(mut table: Table, board: &[StageColumn<'_>]) -> Table {
    table.set_header(vec!["Stage", "Deals", "Total", "Opportunities"]);
    for column in board {
        let names: Vec<&str> = column.opportunities.iter().map(|o| o.name.as_str()).collect();
        table.add_row(vec![
            column.stage.clone(),
            column.opportunities.len().to_string(),
            format_amount(column.total),
            truncate_str(&names.join(", "), 60),
        ]);
    }
    table
}
