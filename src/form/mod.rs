//! The user edit form and the notifications it emits.

mod edit_user;
mod notifier;

pub use edit_user::{
    EditUserForm, FormState, UPDATE_ERROR_TITLE, UPDATE_SUCCESS_TITLE, UserSubmission,
};
pub use notifier::{Notifier, RecordingNotifier, Toast, ToastVariant, TracingNotifier};
