//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;

use crate::models::{Role, Table};

/// Data access for the repair estimate tables
#[derive(Parser, Debug)]
#[command(name = "repair-estimates")]
#[command(about = "Query and edit the repair estimate tables")]
#[command(long_about = "
repair-estimates reads and writes the customer, estimate, job template and
user tables of the hosted repair-estimate database. Every command issues one
request and prints the returned rows as JSON.

TABLES:
    customers, estimates, pre-configured-jobs,
    pre-configured-floor-jobs, pre-configured-roof-jobs, users

EXAMPLES:
    # List all customers
    repair-estimates list customers

    # Fetch one estimate
    repair-estimates get estimates 17

    # Create a roof job template
    repair-estimates add pre-configured-roof-jobs '{\"job_code\":\"R-100\"}'

    # Update a customer from a file
    repair-estimates update customers 3 @customer.json

    # Edit a user the way the edit form does
    repair-estimates edit-user 42 --name \"Jane Doe\" --role advisor

    # Use a specific configuration file with verbose logging
    repair-estimates --config ./config/production.toml --verbose list users

The backend URL and API key come from the [backend] section or from
ESTIMATES_BACKEND__URL and ESTIMATES_BACKEND__API_KEY.
")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// Specify a custom configuration file to use instead of the layered
    /// files under ./config. The file should be in TOML format.
    /// The file must exist and be readable.
    ///
    /// Example: --config /etc/repair-estimates/production.toml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Force a specific environment. This selects which layered
    /// configuration file is loaded.
    ///
    /// Available values: development (dev), staging (stage), production (prod), test
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    ///
    /// Increases log output to debug level, showing every issued query
    /// and cache invalidation. Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Reduces log output to error level only.
    /// Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Bypass the query cache
    #[arg(long)]
    pub no_cache: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every row of a table
    ///
    /// Examples:
    ///   repair-estimates list customers
    ///   repair-estimates list pre-configured-jobs
    List {
        /// Table to read
        #[arg(value_parser = super::validation::validate_table)]
        table: Table,
    },

    /// Fetch exactly one row by id
    ///
    /// Fails when the id matches zero rows.
    Get {
        /// Table to read
        #[arg(value_parser = super::validation::validate_table)]
        table: Table,

        /// Row id
        #[arg(value_parser = super::validation::validate_row_id)]
        id: i64,
    },

    /// Insert one row and print it as created
    ///
    /// The payload is a JSON object without `id`; prefix a path with `@` to
    /// read it from a file.
    Add {
        /// Table to write
        #[arg(value_parser = super::validation::validate_table)]
        table: Table,

        /// JSON object, or @FILE
        #[arg(value_name = "JSON", value_parser = super::validation::validate_json_payload)]
        payload: Value,
    },

    /// Update the row with the given id
    ///
    /// Only the keys present in the payload are written, and `null` clears a
    /// nullable column. An `id` key in the payload is ignored; any other key
    /// that is not a column of the table is rejected.
    Update {
        /// Table to write
        #[arg(value_parser = super::validation::validate_table)]
        table: Table,

        /// Row id
        #[arg(value_parser = super::validation::validate_row_id)]
        id: i64,

        /// JSON object, or @FILE
        #[arg(value_name = "JSON", value_parser = super::validation::validate_json_payload)]
        payload: Value,
    },

    /// Delete the row with the given id
    Delete {
        /// Table to write
        #[arg(value_parser = super::validation::validate_table)]
        table: Table,

        /// Row id
        #[arg(value_parser = super::validation::validate_row_id)]
        id: i64,
    },

    /// Edit a user through the user edit form
    ///
    /// Loads the user, applies the given fields, and submits name, email,
    /// role and dealership together as one update. Fields that are not given
    /// keep their current value.
    ///
    /// Examples:
    ///   repair-estimates edit-user 42 --name "Jane Doe"
    ///   repair-estimates edit-user 42 --email jane@example.com --dealership "North Lot"
    EditUser {
        /// User id
        #[arg(value_parser = super::validation::validate_row_id)]
        id: i64,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New email address
        #[arg(long)]
        email: Option<String>,

        /// New role: admin, advisor or user
        #[arg(long, value_parser = super::validation::validate_role)]
        role: Option<Role>,

        /// New dealership
        #[arg(long)]
        dealership: Option<String>,
    },
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "production", alias = "prod")]
    Production,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "test")]
    Test,
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Production => crate::config::Environment::Production,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Test => crate::config::Environment::Test,
        }
    }
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
    fn test_help_flag() {
        let result = Cli::try_parse_from(["repair-estimates", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_subcommand_required() {
        let result = Cli::try_parse_from(["repair-estimates"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_command() {
        let cli = Cli::try_parse_from(["repair-estimates", "list", "pre-configured-jobs"]).unwrap();
        match cli.command {
            Commands::List { table } => assert_eq!(table, Table::PreConfiguredJobs),
            other => panic!("Expected List command, got {:?}", other),
        }
        assert!(!cli.verbose);
        assert!(!cli.no_cache);
    }

    #[test]
    fn test_unknown_table_rejected() {
        let result = Cli::try_parse_from(["repair-estimates", "list", "invoices"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_update_command() {
        let cli = Cli::try_parse_from([
            "repair-estimates",
            "update",
            "customers",
            "3",
            r#"{"phone":"555-0100"}"#,
        ])
        .unwrap();
        match cli.command {
            Commands::Update { table, id, payload } => {
                assert_eq!(table, Table::Customers);
                assert_eq!(id, 3);
                assert_eq!(payload["phone"], "555-0100");
            }
            other => panic!("Expected Update command, got {:?}", other),
        }
    }

    #[test]
    fn test_get_rejects_non_positive_id() {
        let result = Cli::try_parse_from(["repair-estimates", "get", "customers", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_edit_user_command() {
        let cli = Cli::try_parse_from([
            "repair-estimates",
            "--env",
            "prod",
            "edit-user",
            "42",
            "--name",
            "Jane Doe",
            "--role",
            "advisor",
        ])
        .unwrap();
        assert!(matches!(cli.env, Some(Environment::Production)));
        match cli.command {
            Commands::EditUser {
                id,
                name,
                email,
                role,
                dealership,
            } => {
                assert_eq!(id, 42);
                assert_eq!(name.as_deref(), Some("Jane Doe"));
                assert!(email.is_none());
                assert_eq!(role, Some(Role::Advisor));
                assert!(dealership.is_none());
            }
            other => panic!("Expected EditUser command, got {:?}", other),
        }
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let result = Cli::try_parse_from(["repair-estimates", "--verbose", "--quiet", "list", "users"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
