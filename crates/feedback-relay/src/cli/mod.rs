//! Command-line interface for feedback-relay.
//!
//! This module provides the CLI structure and command definitions for the
//! `fbrelay` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, ListCommand, StatusCommand, SubmitCommand};

/// fbrelay - Record feedback submissions durably
///
/// Appends each submission to a remote spreadsheet when one is configured,
/// falling back to a local CSV file when the remote sink is unreachable, so
/// no submission is silently dropped.
#[derive(Debug, Parser)]
#[command(name = "fbrelay")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a feedback submission
    Submit(SubmitCommand),

    /// Show recent records from the local fallback file
    List(ListCommand),

    /// Show sink configuration and local file status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "fbrelay");
    }

    #[test]
    fn test_verbosity_quiet() {
        let cli = Cli {
            config: None,
            verbose: 0,
            quiet: true,
            command: Command::Status(StatusCommand { json: false }),
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_normal() {
        let cli = Cli {
            config: None,
            verbose: 0,
            quiet: false,
            command: Command::Status(StatusCommand { json: false }),
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_verbose_and_trace() {
        let cli = Cli {
            config: None,
            verbose: 1,
            quiet: false,
            command: Command::Status(StatusCommand { json: false }),
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Verbose);

        let cli = Cli {
            config: None,
            verbose: 3,
            quiet: false,
            command: Command::Status(StatusCommand { json: false }),
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Trace);
    }

    #[test]
    fn test_parse_submit() {
        let args = vec![
            "fbrelay", "submit", "--name", "Ada", "--email", "ada@example.com", "--message",
            "Great tool!",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Submit(cmd) => {
                assert_eq!(cmd.name, "Ada");
                assert_eq!(cmd.email, "ada@example.com");
                assert_eq!(cmd.message, "Great tool!");
                assert!(!cmd.json);
            }
            _ => panic!("expected submit command"),
        }
    }

    #[test]
    fn test_parse_submit_short_flags() {
        let args = vec![
            "fbrelay", "submit", "-n", "Ada", "-e", "ada@example.com", "-m", "hi",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Submit(_)));
    }

    #[test]
    fn test_parse_submit_requires_fields() {
        let args = vec!["fbrelay", "submit", "--name", "Ada"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_list_with_limit() {
        let args = vec!["fbrelay", "list", "--limit", "5"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::List(cmd) => assert_eq!(cmd.limit, 5),
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_parse_list_default_limit() {
        let args = vec!["fbrelay", "list"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::List(cmd) => assert_eq!(cmd.limit, 10),
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_parse_status() {
        let args = vec!["fbrelay", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Status(_)));
    }

    #[test]
    fn test_parse_config_show() {
        let args = vec!["fbrelay", "config", "show"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { .. })
        ));
    }

    #[test]
    fn test_parse_with_config_path() {
        let args = vec!["fbrelay", "-c", "/custom/config.toml", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_quiet() {
        let args = vec!["fbrelay", "-q", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.quiet);
    }
}
