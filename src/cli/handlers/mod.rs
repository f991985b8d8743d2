//! Command handlers for CLI operations
//!
//! This module contains handlers for different CLI commands,
//! separating command execution logic from parsing and validation.

pub mod edit_user;
pub mod table;

pub use edit_user::{EditUserCommandHandler, UserEdits};
pub use table::{TableAction, TableCommandHandler};
