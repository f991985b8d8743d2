//! Query/mutation accessors for every table.
//!
//! Each accessor issues exactly one remote statement. Reads go through the
//! query cache; successful mutations invalidate the table's list entry.

mod entity_repo;
mod query_state;

pub use entity_repo::{EntityRepository, from_backend};
pub use query_state::QueryState;

use std::sync::Arc;

use crate::backend::Backend;
use crate::cache::QueryCache;
use crate::models::{
    Customer, Estimate, PreConfiguredFloorJob, PreConfiguredJob, PreConfiguredRoofJob, User,
};

pub type CustomerRepository = EntityRepository<Customer>;
pub type EstimateRepository = EntityRepository<Estimate>;
pub type PreConfiguredJobRepository = EntityRepository<PreConfiguredJob>;
pub type PreConfiguredFloorJobRepository = EntityRepository<PreConfiguredFloorJob>;
pub type PreConfiguredRoofJobRepository = EntityRepository<PreConfiguredRoofJob>;
pub type UserRepository = EntityRepository<User>;

/// Aggregates all repositories over one backend handle and one cache.
#[derive(Clone)]
pub struct Repositories {
    pub customers: CustomerRepository,
    pub estimates: EstimateRepository,
    pub pre_configured_jobs: PreConfiguredJobRepository,
    pub pre_configured_floor_jobs: PreConfiguredFloorJobRepository,
    pub pre_configured_roof_jobs: PreConfiguredRoofJobRepository,
    pub users: UserRepository,
}

impl Repositories {
    pub fn new(backend: Arc<dyn Backend>, cache: QueryCache) -> Self {
        Self {
            customers: EntityRepository::new(backend.clone(), cache.clone()),
            estimates: EntityRepository::new(backend.clone(), cache.clone()),
            pre_configured_jobs: EntityRepository::new(backend.clone(), cache.clone()),
            pre_configured_floor_jobs: EntityRepository::new(backend.clone(), cache.clone()),
            pre_configured_roof_jobs: EntityRepository::new(backend.clone(), cache.clone()),
            users: EntityRepository::new(backend, cache),
        }
    }
}
