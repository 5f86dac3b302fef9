//! CLI definition for the bizdesk command-line interface.

use std::path::PathBuf;

use bizdesk_fields::{EntityType, FieldKind};
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Entity selector for commands that act on one entity type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EntityArg {
    #[value(alias = "lead")]
    Leads,
    #[value(alias = "contact")]
    Contacts,
    #[value(alias = "account")]
    Accounts,
    #[value(alias = "opportunity")]
    Opportunities,
    #[value(alias = "activity")]
    Activities,
}

impl From<EntityArg> for EntityType {
    fn from(arg: EntityArg) -> Self {
        match arg {
            EntityArg::Leads => EntityType::Lead,
            EntityArg::Contacts => EntityType::Contact,
            EntityArg::Accounts => EntityType::Account,
            EntityArg::Opportunities => EntityType::Opportunity,
            EntityArg::Activities => EntityType::Activity,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Text,
    Number,
    Date,
    Select,
}

impl From<KindArg> for FieldKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Text => FieldKind::Text,
            KindArg::Number => FieldKind::Number,
            KindArg::Date => FieldKind::Date,
            KindArg::Select => FieldKind::Select,
        }
    }
}

/// bizdesk - CRM custom fields and records
#[derive(Parser, Debug)]
#[command(name = "bizdesk")]
#[command(version)]
#[command(about = "Manage CRM custom field layouts and browse records")]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Directory holding layouts and records (overrides configuration)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Seed the sample records for every entity that has none
    Init,
    /// Manage custom field layouts
    #[command(subcommand)]
    Fields(FieldsCommand),
    /// Browse and edit records
    #[command(subcommand)]
    Records(RecordsCommand),
    /// Activities grouped by day
    Calendar {
        /// Only show this day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Opportunities grouped by stage
    Pipeline {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum FieldsCommand {
    /// List an entity's custom fields in layout order
    List {
        #[arg(value_enum)]
        entity: EntityArg,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a custom field
    Add {
        #[arg(value_enum)]
        entity: EntityArg,
        /// Field label
        label: String,
        /// Field type
        #[arg(long = "type", value_enum, default_value_t = KindArg::Text)]
        kind: KindArg,
        /// Choice for a select field (repeatable)
        #[arg(long = "option", value_name = "OPTION")]
        options: Vec<String>,
    },
    /// Edit a custom field; its id and position are kept
    Edit {
        #[arg(value_enum)]
        entity: EntityArg,
        /// Field id
        id: String,
        /// New label
        #[arg(long)]
        label: Option<String>,
        /// New type
        #[arg(long = "type", value_enum)]
        kind: Option<KindArg>,
        /// Choice to append to a select field (repeatable)
        #[arg(long = "option", value_name = "OPTION")]
        options: Vec<String>,
    },
    /// Remove a custom field; record values are kept
    Remove {
        #[arg(value_enum)]
        entity: EntityArg,
        /// Field id
        id: String,
    },
    /// Move a field to the position of another field
    Move {
        #[arg(value_enum)]
        entity: EntityArg,
        /// Field to move
        id: String,
        /// Field whose position it takes
        over: String,
    },
}

/// Filter and sort options for `records list`.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Case-insensitive text to look for in any field
    #[arg(long, short)]
    pub search: Option<String>,
    /// Exact owner name
    #[arg(long)]
    pub owner: Option<String>,
    /// Fixed field to sort by
    #[arg(long)]
    pub sort: Option<String>,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum RecordsCommand {
    /// List records
    List {
        #[arg(value_enum)]
        entity: EntityArg,
        #[command(flatten)]
        args: ListArgs,
    },
    /// Show one record with its custom fields and timeline
    Show {
        #[arg(value_enum)]
        entity: EntityArg,
        id: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a record from name=value pairs (fixed fields or custom field ids)
    Add {
        #[arg(value_enum)]
        entity: EntityArg,
        #[arg(value_name = "NAME=VALUE", required = true)]
        values: Vec<String>,
    },
    /// Set a custom field value
    Set {
        #[arg(value_enum)]
        entity: EntityArg,
        id: u64,
        /// Custom field id or label
        field: String,
        value: String,
    },
    /// Remove a custom field value
    Unset {
        #[arg(value_enum)]
        entity: EntityArg,
        id: u64,
        /// Custom field id or label
        field: String,
    },
    /// Add a note to a record
    Note {
        #[arg(value_enum)]
        entity: EntityArg,
        id: u64,
        text: String,
    },
    /// Record an attachment on a record
    Attach {
        #[arg(value_enum)]
        entity: EntityArg,
        id: u64,
        filename: String,
    },
    /// Delete a record
    Delete {
        #[arg(value_enum)]
        entity: EntityArg,
        id: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_field_add_with_options() {
        let cli = Cli::try_parse_from([
            "bizdesk", "fields", "add", "lead", "Priority", "--type", "select", "--option", "Low",
            "--option", "High",
        ])
        .unwrap();
        match cli.command {
            Commands::Fields(FieldsCommand::Add {
                entity,
                label,
                kind,
                options,
            }) => {
                assert_eq!(entity, EntityArg::Leads);
                assert_eq!(label, "Priority");
                assert_eq!(kind, KindArg::Select);
                assert_eq!(options, vec!["Low", "High"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_records_list_filters() {
        let cli = Cli::try_parse_from([
            "bizdesk", "records", "list", "opportunities", "--owner", "Alice", "--sort", "value",
            "--desc",
        ])
        .unwrap();
        match cli.command {
            Commands::Records(RecordsCommand::List { entity, args }) => {
                assert_eq!(EntityType::from(entity), EntityType::Opportunity);
                assert_eq!(args.owner.as_deref(), Some("Alice"));
                assert_eq!(args.sort.as_deref(), Some("value"));
                assert!(args.desc);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
