//! The five CRM entities.
//!
//! Every entity reads leniently: missing fixed fields default to empty, and a
//! record written before custom fields existed loads with an empty map.

use bizdesk_fields::render::parse_number;
use bizdesk_fields::EntityType;
use serde::{Deserialize, Deserializer, Serialize};

use crate::attributes::CustomAttributes;
use crate::error::{RecordsError, Result};
use crate::journal::Journal;
use crate::record::{null_as_default, Record, SortValue};

/// Implements the accessors that are identical for every entity.
macro_rules! record_common {
    () => {
        fn id(&self) -> u64 {
            self.id
        }

        fn set_id(&mut self, id: u64) {
            self.id = id;
        }

        fn owner(&self) -> &str {
            &self.owner
        }

        fn custom(&self) -> &CustomAttributes {
            &self.custom
        }

        fn custom_mut(&mut self) -> &mut CustomAttributes {
            &mut self.custom
        }

        fn journal(&self) -> &Journal {
            &self.journal
        }

        fn journal_mut(&mut self) -> &mut Journal {
            &mut self.journal
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lead {
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub stage: String,
    #[serde(deserialize_with = "null_as_default")]
    pub owner: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    pub custom: CustomAttributes,
    #[serde(flatten)]
    pub journal: Journal,
}

impl Record for Lead {
    const ENTITY: EntityType = EntityType::Lead;
    const FIELDS: &'static [&'static str] =
        &["name", "company", "status", "stage", "owner", "email", "phone"];
    const DEFAULT_SORT: &'static str = "name";

    record_common!();

    fn title(&self) -> &str {
        &self.name
    }

    fn search_text(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.company.as_str(),
            self.status.as_str(),
            self.stage.as_str(),
            self.owner.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
        ]
    }

    fn field(&self, name: &str) -> Option<String> {
        Self::FIELDS
            .iter()
            .position(|f| *f == name)
            .map(|i| self.search_text()[i].to_string())
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        let slot = match name {
            "name" => &mut self.name,
            "company" => &mut self.company,
            "status" => &mut self.status,
            "stage" => &mut self.stage,
            "owner" => &mut self.owner,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            _ => return Err(RecordsError::unknown_field(Self::ENTITY, name)),
        };
        *slot = value.to_string();
        Ok(())
    }

    fn sort_value(&self, key: &str) -> Option<SortValue> {
        match key {
            "id" => Some(SortValue::Number(self.id as f64)),
            _ => self.field(key).map(SortValue::Text),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub owner: String,
    pub custom: CustomAttributes,
    #[serde(flatten)]
    pub journal: Journal,
}

impl Record for Contact {
    const ENTITY: EntityType = EntityType::Contact;
    const FIELDS: &'static [&'static str] = &["name", "email", "phone", "company", "owner"];
    const DEFAULT_SORT: &'static str = "name";

    record_common!();

    fn title(&self) -> &str {
        &self.name
    }

    fn search_text(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
            self.company.as_str(),
            self.owner.as_str(),
        ]
    }

    fn field(&self, name: &str) -> Option<String> {
        Self::FIELDS
            .iter()
            .position(|f| *f == name)
            .map(|i| self.search_text()[i].to_string())
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        let slot = match name {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "company" => &mut self.company,
            "owner" => &mut self.owner,
            _ => return Err(RecordsError::unknown_field(Self::ENTITY, name)),
        };
        *slot = value.to_string();
        Ok(())
    }

    fn sort_value(&self, key: &str) -> Option<SortValue> {
        match key {
            "id" => Some(SortValue::Number(self.id as f64)),
            _ => self.field(key).map(SortValue::Text),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub industry: String,
    #[serde(deserialize_with = "null_as_default")]
    pub owner: String,
    pub custom: CustomAttributes,
    #[serde(flatten)]
    pub journal: Journal,
}

impl Record for Account {
    const ENTITY: EntityType = EntityType::Account;
    const FIELDS: &'static [&'static str] = &["name", "industry", "owner"];
    const DEFAULT_SORT: &'static str = "name";

    record_common!();

    fn title(&self) -> &str {
        &self.name
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.industry.as_str(), self.owner.as_str()]
    }

    fn field(&self, name: &str) -> Option<String> {
        Self::FIELDS
            .iter()
            .position(|f| *f == name)
            .map(|i| self.search_text()[i].to_string())
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        let slot = match name {
            "name" => &mut self.name,
            "industry" => &mut self.industry,
            "owner" => &mut self.owner,
            _ => return Err(RecordsError::unknown_field(Self::ENTITY, name)),
        };
        *slot = value.to_string();
        Ok(())
    }

    fn sort_value(&self, key: &str) -> Option<SortValue> {
        match key {
            "id" => Some(SortValue::Number(self.id as f64)),
            _ => self.field(key).map(SortValue::Text),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Opportunity {
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub stage: String,
    #[serde(deserialize_with = "number_or_text")]
    pub value: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub owner: String,
    pub custom: CustomAttributes,
    #[serde(flatten)]
    pub journal: Journal,
}

impl Record for Opportunity {
    const ENTITY: EntityType = EntityType::Opportunity;
    const FIELDS: &'static [&'static str] = &["name", "stage", "value", "owner"];
    const DEFAULT_SORT: &'static str = "name";

    record_common!();

    fn title(&self) -> &str {
        &self.name
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.stage.as_str(), self.owner.as_str()]
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "name" => Some(self.name.clone()),
            "stage" => Some(self.stage.clone()),
            "value" => Some(self.value.to_string()),
            "owner" => Some(self.owner.clone()),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "name" => self.name = value.to_string(),
            "stage" => self.stage = value.to_string(),
            "owner" => self.owner = value.to_string(),
            "value" => {
                self.value =
                    parse_number(value).ok_or_else(|| RecordsError::invalid_value(name, value))?
            }
            _ => return Err(RecordsError::unknown_field(Self::ENTITY, name)),
        }
        Ok(())
    }

    fn sort_value(&self, key: &str) -> Option<SortValue> {
        match key {
            "id" => Some(SortValue::Number(self.id as f64)),
            "value" => Some(SortValue::Number(self.value)),
            _ => self.field(key).map(SortValue::Text),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activity {
    pub id: u64,
    /// Call, Meeting, Task ...
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subject: String,
    /// Due date, `YYYY-MM-DD`.
    #[serde(deserialize_with = "null_as_default")]
    pub due: String,
    #[serde(deserialize_with = "null_as_default")]
    pub owner: String,
    /// Reminder time, `YYYY-MM-DDTHH:MM`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder: Option<String>,
    pub custom: CustomAttributes,
    #[serde(flatten)]
    pub journal: Journal,
}

impl Record for Activity {
    const ENTITY: EntityType = EntityType::Activity;
    const FIELDS: &'static [&'static str] = &["type", "subject", "due", "owner", "reminder"];
    const DEFAULT_SORT: &'static str = "due";

    record_common!();

    fn title(&self) -> &str {
        &self.subject
    }

    fn search_text(&self) -> Vec<&str> {
        let mut text = vec![
            self.kind.as_str(),
            self.subject.as_str(),
            self.due.as_str(),
            self.owner.as_str(),
        ];
        if let Some(reminder) = &self.reminder {
            text.push(reminder);
        }
        text
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "type" => Some(self.kind.clone()),
            "subject" => Some(self.subject.clone()),
            "due" => Some(self.due.clone()),
            "owner" => Some(self.owner.clone()),
            "reminder" => Some(self.reminder.clone().unwrap_or_default()),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "type" => self.kind = value.to_string(),
            "subject" => self.subject = value.to_string(),
            "due" => self.due = value.to_string(),
            "owner" => self.owner = value.to_string(),
            "reminder" => {
                self.reminder = Some(value.trim())
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            }
            _ => return Err(RecordsError::unknown_field(Self::ENTITY, name)),
        }
        Ok(())
    }

    fn sort_value(&self, key: &str) -> Option<SortValue> {
        match key {
            "id" => Some(SortValue::Number(self.id as f64)),
            "due" => Some(SortValue::date_or_text(&self.due)),
            _ => self.field(key).map(SortValue::Text),
        }
    }
}

/// Accept a JSON number or numeric text; anything else reads as zero.
fn number_or_text<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or_default(),
        serde_json::Value::String(s) => parse_number(&s).unwrap_or_default(),
        _ => 0.0,
    })
}
