//! repair-estimates library
//!
//! Typed access to the customer, estimate, job template and user tables of
//! the hosted repair-estimate database, plus the user edit form.

pub mod backend;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod logger;
pub mod models;
pub mod repositories;
pub mod state;

pub use state::AppState;

pub fn pkg_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
