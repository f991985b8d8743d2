use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::models::{Record, Table, patch};

/// Role a user holds at a dealership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Advisor,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Advisor => "advisor",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "advisor" => Ok(Role::Advisor),
            "user" => Ok(Role::User),
            _ => Err(AppError::validation(
                "role",
                format!("Invalid role '{}'. Valid values are: admin, advisor, user", s),
            )),
        }
    }
}

/// Row of the `users` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub dealership: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct NewUser {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub role: Role,
    #[validate(length(min = 1, message = "Dealership is required"))]
    pub dealership: String,
}

/// Partial user update. The edit form always fills every field. No column
/// of this table is nullable, so a present key must carry a value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::required")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::required")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::required")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "patch::required")]
    #[validate(length(min = 1, message = "Dealership is required"))]
    pub dealership: Option<String>,
}

impl Record for User {
    const TABLE: Table = Table::Users;
    type New = NewUser;
    type Changes = UpdateUser;

    fn id(&self) -> i64 {
        self.id
    }
}
