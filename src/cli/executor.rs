//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use std::sync::Arc;

use serde_json::Value;

use super::handlers::{EditUserCommandHandler, TableAction, TableCommandHandler, UserEdits};
use super::parser::Commands;
use crate::error::AppResult;
use crate::form::TracingNotifier;
use crate::state::AppState;

/// Execute a CLI command against the given state
///
/// Returns the rows produced by the command as JSON; printing them is up to
/// the caller.
///
/// # Errors
/// Returns errors from command handlers: payload or validation failures, and
/// the backend's message when a request fails
pub async fn execute_command(command: Commands, state: &AppState) -> AppResult<Value> {
    match command {
        Commands::List { table } => table_handler(state).execute(table, TableAction::List).await,
        Commands::Get { table, id } => {
            table_handler(state)
                .execute(table, TableAction::Get(id))
                .await
        }
        Commands::Add { table, payload } => {
            table_handler(state)
                .execute(table, TableAction::Add(payload))
                .await
        }
        Commands::Update { table, id, payload } => {
            table_handler(state)
                .execute(table, TableAction::Update(id, payload))
                .await
        }
        Commands::Delete { table, id } => {
            table_handler(state)
                .execute(table, TableAction::Delete(id))
                .await
        }
        Commands::EditUser {
            id,
            name,
            email,
            role,
            dealership,
        } => {
            let edits = UserEdits {
                name,
                email,
                role,
                dealership,
            };
            EditUserCommandHandler::new(state.repositories.users.clone(), Arc::new(TracingNotifier))
                .execute(id, edits)
                .await
        }
    }
}

fn table_handler(state: &AppState) -> TableCommandHandler {
    TableCommandHandler::new(state.repositories.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::cli::Cli;
    use crate::config::settings::CacheConfig;
    use crate::models::Table;
    use clap::Parser;
    use serde_json::json;

    fn state_with_customer() -> (Arc<InMemoryBackend>, AppState) {
        let backend = Arc::new(InMemoryBackend::new());
        backend.seed(
            Table::Customers,
            [json!({"id": 1, "name": "Acme", "address": "1 Main St", "phone": "555-0100"})],
        );
        let state = AppState::new(backend.clone(), CacheConfig::default());
        (backend, state)
    }

    #[tokio::test]
    async fn test_execute_parsed_list_command() {
        let (_backend, state) = state_with_customer();
        let cli = Cli::try_parse_from(["repair-estimates", "list", "customers"]).unwrap();

        let rows = execute_command(cli.command, &state).await.unwrap();
        assert_eq!(rows[0]["name"], "Acme");
    }

    #[tokio::test]
    async fn test_execute_parsed_update_then_list() {
        let (backend, state) = state_with_customer();

        let cli = Cli::try_parse_from([
            "repair-estimates",
            "update",
            "customers",
            "1",
            r#"{"phone":"555-0199"}"#,
        ])
        .unwrap();
        execute_command(cli.command, &state).await.unwrap();

        let cli = Cli::try_parse_from(["repair-estimates", "list", "customers"]).unwrap();
        let rows = execute_command(cli.command, &state).await.unwrap();
        assert_eq!(rows[0]["phone"], "555-0199");
        assert_eq!(backend.call_count(Table::Customers, "update"), 1);
    }

    #[tokio::test]
    async fn test_execute_edit_user_command() {
        let backend = Arc::new(InMemoryBackend::new());
        backend.seed(
            Table::Users,
            [json!({"id": 42, "name": "Jane Roe", "email": "jroe@example.com", "role": "user", "dealership": "South Lot"})],
        );
        let state = AppState::new(backend.clone(), CacheConfig::default());

        let cli = Cli::try_parse_from([
            "repair-estimates",
            "edit-user",
            "42",
            "--dealership",
            "North Lot",
        ])
        .unwrap();
        let rows = execute_command(cli.command, &state).await.unwrap();

        assert_eq!(rows[0]["dealership"], "North Lot");
        assert_eq!(rows[0]["name"], "Jane Roe");
    }
}
