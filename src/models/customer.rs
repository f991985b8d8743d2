use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Record, Table, patch};

/// Row of the `customers` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Insert payload; the server assigns `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct NewCustomer {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

/// Update payload; only the keys that are set are sent. `email` may be
/// cleared with `Some(None)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateCustomer {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::required")]
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::required")]
    #[validate(length(min = 1, message = "Address must not be empty"))]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::required")]
    #[validate(length(min = 1, message = "Phone must not be empty"))]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::nullable")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<Option<String>>,
}

impl Record for Customer {
    const TABLE: Table = Table::Customers;
    type New = NewCustomer;
    type Changes = UpdateCustomer;

    fn id(&self) -> i64 {
        self.id
    }
}
