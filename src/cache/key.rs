use std::fmt;

use crate::models::Table;

/// Cache key for a read.
///
/// Lists are keyed by table, single rows by `(table, id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    List(Table),
    Row(Table, i64),
}

impl QueryKey {
    pub fn table(&self) -> Table {
        match self {
            QueryKey::List(table) | QueryKey::Row(table, _) => *table,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::List(table) => write!(f, "{}", table),
            QueryKey::Row(table, id) => write!(f, "{}/{}", table, id),
        }
    }
}
