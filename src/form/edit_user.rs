use serde::Serialize;

use crate::error::AppResult;
use crate::form::notifier::{Notifier, Toast};
use crate::models::{Role, UpdateUser, User};
use crate::repositories::{QueryState, UserRepository};

pub const UPDATE_SUCCESS_TITLE: &str = "User updated successfully";
pub const UPDATE_ERROR_TITLE: &str = "Error updating user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Editing,
    Submitting,
}

/// Full field set sent on submit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSubmission {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub dealership: String,
}

impl UserSubmission {
    /// Split into the row id and the columns to write.
    pub fn into_parts(self) -> (i64, UpdateUser) {
        (
            self.id,
            UpdateUser {
                name: Some(self.name),
                email: Some(self.email),
                role: Some(self.role),
                dealership: Some(self.dealership),
            },
        )
    }
}

/// Edit form for one user record.
///
/// Holds local copies of the editable fields. The source record is never
/// patched locally; the list refetch after the update brings it up to date.
#[derive(Debug, Clone)]
pub struct EditUserForm {
    user_id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub dealership: String,
    state: FormState,
}

impl EditUserForm {
    pub fn new(user: &User) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            dealership: user.dealership.clone(),
            state: FormState::Editing,
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> &mut Self {
        self.email = email.into();
        self
    }

    pub fn set_role(&mut self, role: Role) -> &mut Self {
        self.role = role;
        self
    }

    pub fn set_dealership(&mut self, dealership: impl Into<String>) -> &mut Self {
        self.dealership = dealership.into();
        self
    }

    pub fn submission(&self) -> UserSubmission {
        UserSubmission {
            id: self.user_id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            dealership: self.dealership.clone(),
        }
    }

    /// Enter [`FormState::Submitting`] and take the field set to send.
    ///
    /// Pair with [`Self::finish`] once the update has resolved.
    pub fn begin_submit(&mut self) -> UserSubmission {
        self.state = FormState::Submitting;
        tracing::info!(user_id = self.user_id, "submitting user update");
        self.submission()
    }

    /// Leave [`FormState::Submitting`] and report `outcome` through
    /// `notifier`: a success toast, or an error toast carrying the message.
    pub fn finish(
        &mut self,
        outcome: AppResult<Vec<User>>,
        notifier: &dyn Notifier,
    ) -> AppResult<Vec<User>> {
        self.state = FormState::Editing;
        match &outcome {
            Ok(_) => notifier.notify(Toast::success(UPDATE_SUCCESS_TITLE)),
            Err(e) => notifier.notify(Toast::error(UPDATE_ERROR_TITLE, e.to_string())),
        }
        outcome
    }

    /// Send the full field set as one update and report the outcome.
    ///
    /// Errors are not propagated: they become an error toast carrying the
    /// message, and the returned state holds them. The form is back in
    /// [`FormState::Editing`] when this returns, whatever the outcome.
    pub async fn submit(
        &mut self,
        users: &UserRepository,
        notifier: &dyn Notifier,
    ) -> QueryState<Vec<User>> {
        let (id, changes) = self.begin_submit().into_parts();
        let outcome = users.update(id, changes).await;
        self.finish(outcome, notifier).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::backend::{Filter, InMemoryBackend, Operation};
    use crate::cache::QueryCache;
    use crate::config::settings::CacheConfig;
    use crate::form::notifier::{RecordingNotifier, ToastVariant};
    use crate::models::Table;
    use crate::repositories::EntityRepository;
    use serde_json::json;

    fn user_42() -> User {
        User {
            id: 42,
            name: "Jane Roe".into(),
            email: "jroe@example.com".into(),
            role: Role::User,
            dealership: "South Lot".into(),
        }
    }

    fn setup() -> (Arc<InMemoryBackend>, UserRepository) {
        let backend = Arc::new(InMemoryBackend::new());
        backend.seed(Table::Users, [serde_json::to_value(user_42()).unwrap()]);
        let repo = EntityRepository::new(backend.clone(), QueryCache::new(CacheConfig::default()));
        (backend, repo)
    }

    fn fill(form: &mut EditUserForm) {
        form.set_name("Jane Doe")
            .set_email("jane@example.com")
            .set_role(Role::Advisor)
            .set_dealership("North Lot");
    }

    #[tokio::test]
    async fn test_submit_sends_one_update_and_notifies_success() {
        let (backend, users) = setup();
        let notifier = RecordingNotifier::new();
        let mut form = EditUserForm::new(&user_42());
        fill(&mut form);

        assert_eq!(
            serde_json::to_value(form.submission()).unwrap(),
            json!({
                "id": 42,
                "name": "Jane Doe",
                "email": "jane@example.com",
                "role": "advisor",
                "dealership": "North Lot"
            })
        );

        let outcome = form.submit(&users, &notifier).await;
        assert!(outcome.is_success());
        assert_eq!(form.state(), FormState::Editing);

        let updates: Vec<_> = backend
            .calls()
            .into_iter()
            .filter(|q| matches!(q.operation, Operation::Update { .. }))
            .collect();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].table, Table::Users);
        assert_eq!(
            updates[0].filters,
            vec![Filter::Eq { column: "id".into(), value: json!(42) }]
        );
        assert_eq!(
            updates[0].operation,
            Operation::Update {
                values: json!({
                    "name": "Jane Doe",
                    "email": "jane@example.com",
                    "role": "advisor",
                    "dealership": "North Lot"
                })
            }
        );

        assert_eq!(notifier.toasts(), vec![Toast::success("User updated successfully")]);
        assert_eq!(backend.rows(Table::Users)[0]["dealership"], "North Lot");
    }

    #[tokio::test]
    async fn test_submit_reports_backend_error() {
        let (backend, users) = setup();
        let notifier = RecordingNotifier::new();
        let mut form = EditUserForm::new(&user_42());
        fill(&mut form);

        backend.fail_next("duplicate email");
        let outcome = form.submit(&users, &notifier).await;

        assert_eq!(outcome.error().unwrap().to_string(), "duplicate email");
        assert_eq!(form.state(), FormState::Editing);
        let toasts = notifier.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].title, "Error updating user");
        assert_eq!(toasts[0].description.as_deref(), Some("duplicate email"));
        assert_eq!(toasts[0].variant, ToastVariant::Destructive);
        // Local edits survive a failed submit
        assert_eq!(form.name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_missing_required_field_is_not_submitted() {
        let (backend, users) = setup();
        let notifier = RecordingNotifier::new();
        let mut form = EditUserForm::new(&user_42());
        form.set_dealership("").set_email("not-an-email");

        let outcome = form.submit(&users, &notifier).await;

        assert!(outcome.is_error());
        assert!(backend.calls().is_empty());
        let toast = &notifier.toasts()[0];
        assert_eq!(toast.title, UPDATE_ERROR_TITLE);
        let description = toast.description.as_deref().unwrap();
        assert!(description.contains("dealership"));
        assert!(description.contains("email"));
    }

    #[tokio::test]
    async fn test_form_is_submitting_while_update_is_in_flight() {
        let (backend, users) = setup();
        let notifier = RecordingNotifier::new();
        let mut form = EditUserForm::new(&user_42());
        form.set_name("Jane Doe");
        assert_eq!(form.state(), FormState::Editing);

        let (id, changes) = form.begin_submit().into_parts();
        assert_eq!(form.state(), FormState::Submitting);
        assert_eq!(id, 42);
        assert!(notifier.toasts().is_empty());

        let update = users.update(id, changes);
        // Nothing has been sent until the update is awaited
        assert!(backend.calls().is_empty());
        assert_eq!(form.state(), FormState::Submitting);

        let rows = form.finish(update.await, &notifier).unwrap();
        assert_eq!(form.state(), FormState::Editing);
        assert_eq!(rows[0].name, "Jane Doe");
        assert_eq!(notifier.toasts(), vec![Toast::success(UPDATE_SUCCESS_TITLE)]);
    }

    #[tokio::test]
    async fn test_finish_with_error_returns_to_editing() {
        let notifier = RecordingNotifier::new();
        let mut form = EditUserForm::new(&user_42());
        form.begin_submit();

        let err = form
            .finish(Err(crate::error::AppError::backend("timeout")), &notifier)
            .unwrap_err();

        assert_eq!(err.to_string(), "timeout");
        assert_eq!(form.state(), FormState::Editing);
        assert_eq!(notifier.toasts()[0].description.as_deref(), Some("timeout"));
    }
}
