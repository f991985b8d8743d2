//! Record types for every remote table.
//!
//! Field names are the wire contract with the remote store and must match the
//! column names exactly.

mod customer;
mod estimate;
mod job;
pub mod line_items;
pub mod patch;
mod table;
mod user;

pub use customer::{Customer, NewCustomer, UpdateCustomer};
pub use estimate::{Estimate, EstimateFields};
pub use job::{
    NewPreConfiguredFloorJob, NewPreConfiguredJob, NewPreConfiguredRoofJob, PreConfiguredFloorJob,
    PreConfiguredJob, PreConfiguredRoofJob, UpdatePreConfiguredFloorJob, UpdatePreConfiguredJob,
    UpdatePreConfiguredRoofJob,
};
pub use line_items::{JsonColumn, LineItem, PartAmounts};
pub use table::Table;
pub use user::{NewUser, Role, UpdateUser, User};

use serde::Serialize;
use serde::de::DeserializeOwned;
use validator::Validate;

/// A row type bound to one remote table, with its insert and update payloads.
pub trait Record: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    const TABLE: Table;

    /// Insert payload; never carries `id`.
    type New: Serialize + DeserializeOwned + Validate + Send + Sync;

    /// Update payload; only the keys it serializes are written, and an
    /// explicit `null` clears a nullable column.
    type Changes: Serialize + DeserializeOwned + Validate + Send + Sync;

    fn id(&self) -> i64;
}
