//! bizdesk - CRM custom fields and records from the terminal.
//!
//! The binary in `main.rs` parses [`Cli`] and hands each subcommand to the
//! matching module here. Every handler works on a [`context::Workspace`],
//! which pairs the layered [`config::BizdeskConfig`] with file storage under
//! its data directory.

pub mod boards;
pub mod cli;
pub mod config;
pub mod context;
pub mod fields;
pub mod init;
pub mod records;
pub mod table;

pub use cli::{Cli, Commands};
