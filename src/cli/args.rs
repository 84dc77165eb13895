//! CLI argument definitions using clap
//!
//! Commands:
//! - collguard enforce [--mode TEST|PROD] [--uri <uri>] [--config <path>]
//! - collguard inspect [--mode TEST|PROD] [--uri <uri>] [--config <path>]
//! - collguard print-schema
//! - collguard check [--file <path>] [--verify-hash]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::observability::Severity;

/// collguard - enforce a strict $jsonSchema validator on a MongoDB collection
#[derive(Parser, Debug)]
#[command(name = "collguard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Minimum log severity written to stderr
    #[arg(long, global = true, default_value = "info")]
    pub log_level: Severity,

    #[command(subcommand)]
    pub command: Command,
}

/// Where to connect
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetArgs {
    /// Target environment, TEST or PROD (default TEST)
    #[arg(long)]
    pub mode: Option<String>,

    /// MongoDB connection string
    #[arg(long, env = "MONGO_URI", hide_env_values = true)]
    pub uri: Option<String>,

    /// Optional JSON settings file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the collection with its validator, or replace the validator
    Enforce(TargetArgs),

    /// Show the collection's current validator and validation options
    Inspect(TargetArgs),

    /// Print the validator document as extended JSON
    PrintSchema,

    /// Validate one JSON document locally against the schema
    Check {
        /// Read the document from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,

        /// Reject the document when its doc_hash does not match its content
        #[arg(long)]
        verify_hash: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_enforce() {
        let cli = Cli::try_parse_from([
            "collguard",
            "enforce",
            "--mode",
            "PROD",
            "--uri",
            "mongodb://localhost:27017",
        ])
        .unwrap();

        match cli.command {
            Command::Enforce(target) => {
                assert_eq!(target.mode.as_deref(), Some("PROD"));
                assert_eq!(target.uri.as_deref(), Some("mongodb://localhost:27017"));
                assert!(target.config.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.log_level, Severity::Info);
    }

    #[test]
    fn test_parse_log_level_and_check() {
        let cli = Cli::try_parse_from(["collguard", "--log-level", "error", "check", "--file", "doc.json"])
            .unwrap();
        assert_eq!(cli.log_level, Severity::Error);
        assert!(matches!(cli.command, Command::Check { file: Some(_), verify_hash: false }));
    }

    #[test]
    fn test_parse_check_verify_hash() {
        let cli = Cli::try_parse_from(["collguard", "check", "--verify-hash"]).unwrap();
        assert!(matches!(cli.command, Command::Check { file: None, verify_hash: true }));
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        assert!(Cli::try_parse_from(["collguard", "--log-level", "loud", "print-schema"]).is_err());
    }
}
