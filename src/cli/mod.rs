//! CLI module for collguard
//!
//! Provides command-line interface for:
//! - enforce: Create or update the collection's validator
//! - inspect: Show the collection's current validator
//! - print-schema: Print the validator document
//! - check: Validate a document locally

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, TargetArgs};
pub use commands::{
    check, enforce_with, inspect_with, print_schema, run, run_command, Settings, DEFAULT_MODE,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_document, read_document, write_error, write_response, write_text};
