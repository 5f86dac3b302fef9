//! `bizdesk init` - create the data directory and seed sample records.

use anyhow::{Context, Result};
use bizdesk_records::sample;

use crate::context::Workspace;

pub async fn run(ws: &Workspace) -> Result<()> {
    let seeded = sample::seed(ws.storage.as_ref())
        .await
        .context("failed to seed sample records")?;

    let dir = ws.storage.root().display();
    if seeded.is_empty() {
        println!("{dir} already has records for every entity; nothing seeded.");
    } else {
        let names: Vec<String> = seeded.iter().map(ToString::to_string).collect();
        println!("Seeded {} in {dir}", names.join(", "));
    }
    Ok(())
}
