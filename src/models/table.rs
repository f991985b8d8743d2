//! Remote table identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One of the tables exposed by the backend.
///
/// Used as the typed cache key and as the path segment of every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Customers,
    Estimates,
    PreConfiguredJobs,
    PreConfiguredFloorJobs,
    PreConfiguredRoofJobs,
    Users,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Table::Customers,
        Table::Estimates,
        Table::PreConfiguredJobs,
        Table::PreConfiguredFloorJobs,
        Table::PreConfiguredRoofJobs,
        Table::Users,
    ];

    /// Table name as known to the remote store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Customers => "customers",
            Table::Estimates => "estimates",
            Table::PreConfiguredJobs => "pre_configured_jobs",
            Table::PreConfiguredFloorJobs => "pre_configured_floor_jobs",
            Table::PreConfiguredRoofJobs => "pre_configured_roof_jobs",
            Table::Users => "users",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Table {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Table::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| {
                AppError::validation(
                    "table",
                    format!(
                        "Unknown table '{}'. Valid values are: {}",
                        s,
                        Table::ALL.map(|t| t.as_str()).join(", ")
                    ),
                )
            })
    }
}
