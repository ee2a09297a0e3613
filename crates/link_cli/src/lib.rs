//! Terminal front end of the issue to repository link integration.
//!
//! The `issue-link` binary exposes every controller operation as a
//! subcommand and renders the results through [`terminal::TerminalHost`].

pub mod commands;
pub mod config;
pub mod draft;
pub mod errors;
pub mod terminal;
