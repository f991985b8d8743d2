//! Table command handler
//!
//! Runs list/get/add/update/delete against whichever table the command
//! names and renders the rows as JSON.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::{Record, Table};
use crate::repositories::{EntityRepository, Repositories};

/// One accessor call, detached from its table
#[derive(Debug, Clone, PartialEq)]
pub enum TableAction {
    List,
    Get(i64),
    Add(Value),
    Update(i64, Value),
    Delete(i64),
}

impl TableAction {
    pub fn name(&self) -> &'static str {
        match self {
            TableAction::List => "list",
            TableAction::Get(_) => "get",
            TableAction::Add(_) => "add",
            TableAction::Update(..) => "update",
            TableAction::Delete(_) => "delete",
        }
    }
}

/// Handler for the table commands
pub struct TableCommandHandler {
    repositories: Repositories,
}

impl TableCommandHandler {
    pub fn new(repositories: Repositories) -> Self {
        Self { repositories }
    }

    /// Execute `action` against `table` and return the resulting rows as JSON.
    ///
    /// # Errors
    /// - payload fields that do not fit the table's insert/update shape
    /// - validation failures, before any request is made
    /// - the backend's message when the request fails
    pub async fn execute(&self, table: Table, action: TableAction) -> AppResult<Value> {
        tracing::debug!(%table, action = action.name(), "running table command");

        let repos = &self.repositories;
        match table {
            Table::Customers => run_action(&repos.customers, action).await,
            Table::Estimates => run_action(&repos.estimates, action).await,
            Table::PreConfiguredJobs => run_action(&repos.pre_configured_jobs, action).await,
            Table::PreConfiguredFloorJobs => {
                run_action(&repos.pre_configured_floor_jobs, action).await
            }
            Table::PreConfiguredRoofJobs => {
                run_action(&repos.pre_configured_roof_jobs, action).await
            }
            Table::Users => run_action(&repos.users, action).await,
        }
    }
}

async fn run_action<R: Record>(repo: &EntityRepository<R>, action: TableAction) -> AppResult<Value> {
    match action {
        TableAction::List => to_json::<R, _>(&repo.list().await?),
        TableAction::Get(id) => to_json::<R, _>(&repo.get(id).await?),
        TableAction::Add(payload) => {
            let new: R::New = parse_payload::<R, _>(payload)?;
            to_json::<R, _>(&repo.add(new).await?)
        }
        TableAction::Update(id, payload) => {
            let changes: R::Changes = parse_payload::<R, _>(payload)?;
            to_json::<R, _>(&repo.update(id, changes).await?)
        }
        TableAction::Delete(id) => to_json::<R, _>(&repo.delete(id).await?),
    }
}

/// Decode a CLI payload into the table's insert or update type.
///
/// `id` is always server-owned and is dropped before decoding. Any other key
/// that is not a column of the table is an error.
fn parse_payload<R: Record, T: DeserializeOwned>(mut payload: Value) -> AppResult<T> {
    if let Value::Object(ref mut columns) = payload
        && columns.remove("id").is_some()
    {
        tracing::debug!(table = %R::TABLE, "ignoring id in payload");
    }
    serde_json::from_value(payload).map_err(|e| AppError::Payload {
        table: R::TABLE.to_string(),
        message: e.to_string(),
    })
}

fn to_json<R: Record, T: Serialize>(rows: &T) -> AppResult<Value> {
    serde_json::to_value(rows).map_err(|e| AppError::Payload {
        table: R::TABLE.to_string(),
        message: e.to_string(),
    })
}
