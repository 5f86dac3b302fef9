//! Demo records for a fresh workspace.

use bizdesk_fields::EntityType;
use tracing::info;

use crate::entities::{Account, Activity, Contact, Lead, Opportunity};
use crate::error::Result;
use crate::record::Record;
use crate::store::RecordStore;

pub fn leads() -> Vec<Lead> {
    vec![
        Lead {
            id: 1,
            name: "John Doe".into(),
            company: "Acme Corp".into(),
            status: "New".into(),
            stage: "Lead".into(),
            owner: "Alice".into(),
            email: "john@acme.com".into(),
            phone: "9876543210".into(),
            ..Lead::default()
        },
        Lead {
            id: 2,
            name: "Jane Smith".into(),
            company: "Beta Ltd".into(),
            status: "Contacted".into(),
            stage: "Qualified".into(),
            owner: "Bob".into(),
            ..Lead::default()
        },
        Lead {
            id: 3,
            name: "Sam Patel".into(),
            company: "Gamma Inc".into(),
            status: "Lost".into(),
            stage: "Lost".into(),
            owner: "Alice".into(),
            ..Lead::default()
        },
    ]
}

pub fn contacts() -> Vec<Contact> {
    vec![
        Contact {
            id: 1,
            name: "John Doe".into(),
            email: "john@acme.com".into(),
            phone: "9876543210".into(),
            company: "Acme Corp".into(),
            owner: "Alice".into(),
            ..Contact::default()
        },
        Contact {
            id: 2,
            name: "Jane Smith".into(),
            email: "jane@beta.com".into(),
            phone: "9123456780".into(),
            company: "Beta Ltd".into(),
            owner: "Bob".into(),
            ..Contact::default()
        },
    ]
}

pub fn accounts() -> Vec<Account> {
    vec![
        Account {
            id: 1,
            name: "Acme Corp".into(),
            industry: "Manufacturing".into(),
            owner: "Alice".into(),
            ..Account::default()
        },
        Account {
            id: 2,
            name: "Beta Ltd".into(),
            industry: "IT Services".into(),
            owner: "Bob".into(),
            ..Account::default()
        },
    ]
}

pub fn opportunities() -> Vec<Opportunity> {
    [
        ("Acme Deal", "New", 50000.0, "Alice"),
        ("Beta Project", "Qualified", 20000.0, "Bob"),
        ("Gamma Contract", "Proposal", 35000.0, "Alice"),
        ("Delta Sale", "Won", 100000.0, "Bob"),
        ("Epsilon Pitch", "Lost", 0.0, "Alice"),
    ]
    .into_iter()
    .zip(1..)
    .map(|((name, stage, value, owner), id)| Opportunity {
        id,
        name: name.into(),
        stage: stage.into(),
        value,
        owner: owner.into(),
        ..Opportunity::default()
    })
    .collect()
}

pub fn activities() -> Vec<Activity> {
    vec![
        Activity {
            id: 1,
            kind: "Call".into(),
            subject: "Follow up with John".into(),
            due: "2024-06-10".into(),
            owner: "Alice".into(),
            reminder: Some("2024-06-10T10:00".into()),
            ..Activity::default()
        },
        Activity {
            id: 2,
            kind: "Meeting".into(),
            subject: "Demo for Beta Ltd".into(),
            due: "2024-06-12".into(),
            owner: "Bob".into(),
            reminder: Some("2024-06-12T15:00".into()),
            ..Activity::default()
        },
    ]
}

async fn seed_one<R: Record, S: RecordStore + ?Sized>(
    store: &S,
    records: Vec<R>,
    seeded: &mut Vec<EntityType>,
) -> Result<()> {
    if store.has_records::<R>().await {
        return Ok(());
    }
    store.save_records(&records).await?;
    info!(entity = %R::ENTITY, records = records.len(), "seeded sample records");
    seeded.push(R::ENTITY);
    Ok(())
}

/// Write the demo records for every entity that has none yet.
///
/// Returns the entities that were seeded.
pub async fn seed<S: RecordStore + ?Sized>(store: &S) -> Result<Vec<EntityType>> {
    let mut seeded = Vec::new();
    seed_one(store, leads(), &mut seeded).await?;
    seed_one(store, contacts(), &mut seeded).await?;
    seed_one(store, accounts(), &mut seeded).await?;
    seed_one(store, opportunities(), &mut seeded).await?;
    seed_one(store, activities(), &mut seeded).await?;
    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizdesk_store::MemoryStorage;

    #[tokio::test]
    async fn seed_fills_only_missing_entities() {
        let storage = MemoryStorage::new();
        storage.save_records::<Lead>(&[]).await.unwrap();

        let seeded = seed(&storage).await.unwrap();

        assert_eq!(
            seeded,
            vec![
                EntityType::Contact,
                EntityType::Account,
                EntityType::Opportunity,
                EntityType::Activity
            ]
        );
        assert!(storage.load_records::<Lead>().await.is_empty());
        assert_eq!(storage.load_records::<Opportunity>().await.len(), 5);

        assert!(seed(&storage).await.unwrap().is_empty());
    }
}
