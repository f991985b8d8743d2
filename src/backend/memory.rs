//! In-process stand-in for the remote store.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{Backend, BackendFailure, BackendResponse, Filter, Operation, Query};
use crate::models::Table;

/// Message the store reports when a single-row read matches zero or many rows.
pub const SINGLE_ROW_VIOLATION: &str = "JSON object requested, multiple (or no) rows returned";

type Row = Map<String, Value>;

#[derive(Default)]
struct State {
    tables: HashMap<Table, BTreeMap<i64, Row>>,
    sequences: HashMap<Table, i64>,
    calls: Vec<Query>,
    fail_next: Option<String>,
}

/// Backend that keeps rows in memory and honours the same contract as the
/// hosted store: server-assigned ids, the single-row rule, unique job codes
/// on template tables, and `{data, error}` responses.
///
/// Every executed query is recorded so callers can assert on exactly what
/// was sent.
#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<State>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert rows directly, bypassing the call log. Rows without an `id`
    /// get the next sequence value.
    pub fn seed(&self, table: Table, rows: impl IntoIterator<Item = Value>) {
        let mut state = self.lock();
        for row in rows {
            if let Value::Object(row) = row {
                let _ = state.insert_row(table, row);
            }
        }
    }

    /// Make the next call fail with `message`, whatever it is.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.lock().fail_next = Some(message.into());
    }

    /// Every query executed so far, in order.
    pub fn calls(&self) -> Vec<Query> {
        self.lock().calls.clone()
    }

    /// Number of executed queries against `table` with the given operation name.
    pub fn call_count(&self, table: Table, operation: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|q| q.table == table && q.operation.name() == operation)
            .count()
    }

    /// Current rows of `table`, ordered by id.
    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.lock()
            .tables
            .get(&table)
            .map(|rows| rows.values().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }
}

fn unique_column(table: Table) -> Option<&'static str> {
    match table {
        Table::PreConfiguredJobs | Table::PreConfiguredFloorJobs | Table::PreConfiguredRoofJobs => {
            Some("job_code")
        }
        _ => None,
    }
}

fn duplicate_key(table: Table, constraint: &str) -> BackendFailure {
    BackendFailure::new(format!(
        "duplicate key value violates unique constraint \"{}_{}\"",
        table, constraint
    ))
    .with_code("23505")
}

impl State {
    fn insert_row(&mut self, table: Table, mut row: Row) -> Result<Row, BackendFailure> {
        let id = match row.get("id").and_then(Value::as_i64) {
            Some(id) => id,
            None => self.sequences.get(&table).copied().unwrap_or(0) + 1,
        };
        let rows = self.tables.entry(table).or_default();
        if rows.contains_key(&id) {
            return Err(duplicate_key(table, "pkey"));
        }
        // NULLs never collide under a unique constraint
        if let Some(column) = unique_column(table)
            && let Some(value) = row.get(column).filter(|v| !v.is_null())
            && rows.values().any(|r| r.get(column) == Some(value))
        {
            return Err(duplicate_key(table, &format!("{}_key", column)));
        }
        row.insert("id".to_string(), Value::from(id));
        rows.insert(id, row.clone());
        let seq = self.sequences.entry(table).or_insert(0);
        *seq = (*seq).max(id);
        Ok(row)
    }

    fn insert_all(&mut self, table: Table, rows: &[Value]) -> Result<Vec<Value>, BackendFailure> {
        rows.iter()
            .map(|row| match row {
                Value::Object(row) => self.insert_row(table, row.clone()).map(Value::Object),
                _ => Err(BackendFailure::new("insert payload must be an object")),
            })
            .collect()
    }

    fn restore(&mut self, table: Table, rows: Option<BTreeMap<i64, Row>>, sequence: Option<i64>) {
        match rows {
            Some(rows) => self.tables.insert(table, rows),
            None => self.tables.remove(&table),
        };
        match sequence {
            Some(sequence) => self.sequences.insert(table, sequence),
            None => self.sequences.remove(&table),
        };
    }

    fn matching_ids(&self, table: Table, filters: &[Filter]) -> Vec<i64> {
        self.tables
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .filter(|(_, row)| filters.iter().all(|f| f.matches(row)))
                    .map(|(id, _)| *id)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn run(&mut self, query: &Query) -> BackendResponse {
        let table = query.table;
        match &query.operation {
            Operation::Select { single } => {
                let ids = self.matching_ids(table, &query.filters);
                let rows: Vec<Value> = ids
                    .iter()
                    .filter_map(|id| self.tables.get(&table).and_then(|t| t.get(id)))
                    .cloned()
                    .map(Value::Object)
                    .collect();
                if !*single {
                    return BackendResponse::ok(Value::Array(rows));
                }
                if rows.len() != 1 {
                    return BackendResponse::failure(
                        BackendFailure::new(SINGLE_ROW_VIOLATION)
                            .with_code("PGRST116")
                            .with_details(format!("The result contains {} rows", rows.len())),
                    );
                }
                BackendResponse::ok(rows.into_iter().next().unwrap_or(Value::Null))
            }
            Operation::Insert { rows } => {
                // A batch insert is one statement: all rows land or none do
                let snapshot = self.tables.get(&table).cloned();
                let sequence = self.sequences.get(&table).copied();
                match self.insert_all(table, rows) {
                    Ok(inserted) => BackendResponse::ok(Value::Array(inserted)),
                    Err(failure) => {
                        self.restore(table, snapshot, sequence);
                        BackendResponse::failure(failure)
                    }
                }
            }
            Operation::Update { values } => {
                let Value::Object(values) = values else {
                    return BackendResponse::failed("update payload must be an object");
                };
                if values.contains_key("id") {
                    return BackendResponse::failed("column \"id\" can only be updated to DEFAULT");
                }
                let ids = self.matching_ids(table, &query.filters);
                if let Some(column) = unique_column(table)
                    && let Some(value) = values.get(column).filter(|v| !v.is_null())
                {
                    let clash = self.tables.get(&table).is_some_and(|rows| {
                        rows.iter()
                            .any(|(id, r)| !ids.contains(id) && r.get(column) == Some(value))
                    });
                    if clash {
                        return BackendResponse::failure(duplicate_key(
                            table,
                            &format!("{}_key", column),
                        ));
                    }
                }
                let rows = self.tables.entry(table).or_default();
                let mut updated = Vec::with_capacity(ids.len());
                for id in ids {
                    if let Some(row) = rows.get_mut(&id) {
                        for (k, v) in values {
                            row.insert(k.clone(), v.clone());
                        }
                        updated.push(Value::Object(row.clone()));
                    }
                }
                BackendResponse::ok(Value::Array(updated))
            }
            Operation::Delete => {
                let ids = self.matching_ids(table, &query.filters);
                let rows = self.tables.entry(table).or_default();
                let deleted = ids
                    .into_iter()
                    .filter_map(|id| rows.remove(&id))
                    .map(Value::Object)
                    .collect();
                BackendResponse::ok(Value::Array(deleted))
            }
        }
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn execute(&self, query: Query) -> BackendResponse {
        let mut state = self.lock();
        state.calls.push(query.clone());
        if let Some(message) = state.fail_next.take() {
            return BackendResponse::failed(message);
        }
        state.run(&query)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
