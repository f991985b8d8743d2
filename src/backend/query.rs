//! Declarative description of one remote statement.

use serde_json::Value;

use crate::models::Table;

/// Column filter. Only equality is needed by the accessors.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq { column: String, value: Value },
}

impl Filter {
    pub fn column(&self) -> &str {
        match self {
            Filter::Eq { column, .. } => column,
        }
    }

    /// Filter value in PostgREST operator syntax, e.g. `eq.42`.
    pub fn to_param(&self) -> String {
        match self {
            Filter::Eq { value, .. } => match value {
                Value::String(s) => format!("eq.{}", s),
                Value::Null => "is.null".to_string(),
                other => format!("eq.{}", other),
            },
        }
    }

    pub fn matches(&self, row: &serde_json::Map<String, Value>) -> bool {
        match self {
            Filter::Eq { column, value } => row.get(column).unwrap_or(&Value::Null) == value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Select all columns; `single` demands exactly one matching row.
    Select { single: bool },
    Insert { rows: Vec<Value> },
    Update { values: Value },
    Delete,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Select { single: false } => "select",
            Operation::Select { single: true } => "select_single",
            Operation::Insert { .. } => "insert",
            Operation::Update { .. } => "update",
            Operation::Delete => "delete",
        }
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(self, Operation::Select { .. })
    }
}

/// One statement against one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: Table,
    pub operation: Operation,
    pub filters: Vec<Filter>,
}

impl Query {
    fn new(table: Table, operation: Operation) -> Self {
        Self {
            table,
            operation,
            filters: Vec::new(),
        }
    }

    pub fn select(table: Table) -> Self {
        Self::new(table, Operation::Select { single: false })
    }

    pub fn insert(table: Table, rows: Vec<Value>) -> Self {
        Self::new(table, Operation::Insert { rows })
    }

    pub fn update(table: Table, values: Value) -> Self {
        Self::new(table, Operation::Update { values })
    }

    pub fn delete(table: Table) -> Self {
        Self::new(table, Operation::Delete)
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    /// Expect exactly one row. Has no effect on mutations.
    pub fn single(mut self) -> Self {
        if let Operation::Select { single } = &mut self.operation {
            *single = true;
        }
        self
    }
}
