//! Edit-user command handler
//!
//! Drives [`EditUserForm`] from the command line: load the user, apply the
//! given fields, submit, and report through a [`Notifier`].

use std::sync::Arc;

use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::form::{EditUserForm, Notifier};
use crate::models::Role;
use crate::repositories::UserRepository;

/// Field overrides given on the command line; `None` keeps the loaded value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserEdits {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub dealership: Option<String>,
}

/// Handler for the edit-user command
pub struct EditUserCommandHandler {
    users: UserRepository,
    notifier: Arc<dyn Notifier>,
}

impl EditUserCommandHandler {
    pub fn new(users: UserRepository, notifier: Arc<dyn Notifier>) -> Self {
        Self { users, notifier }
    }

    /// Load user `id`, apply `edits` and submit the form once.
    ///
    /// Returns the updated rows as JSON. A failed submit has already been
    /// reported through the notifier and is returned as the error. Drives the
    /// form's submit steps directly so the outcome stays a plain result.
    pub async fn execute(&self, id: i64, edits: UserEdits) -> AppResult<Value> {
        let user = self.users.get(id).await?;

        let mut form = EditUserForm::new(&user);
        if let Some(name) = edits.name {
            form.set_name(name);
        }
        if let Some(email) = edits.email {
            form.set_email(email);
        }
        if let Some(role) = edits.role {
            form.set_role(role);
        }
        if let Some(dealership) = edits.dealership {
            form.set_dealership(dealership);
        }

        let (user_id, changes) = form.begin_submit().into_parts();
        let outcome = self.users.update(user_id, changes).await;
        let rows = form.finish(outcome, self.notifier.as_ref())?;

        serde_json::to_value(&rows).map_err(|e| AppError::Payload {
            table: self.users.table().to_string(),
            message: e.to_string(),
        })
    }
}
