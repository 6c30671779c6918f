use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A row of the `users` table.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default, sqlx::FromRow)]
pub struct User {
    pub id: i32, // assigned by the store on insert
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub user_id: i32, // caller supplied, not the store id
}

/// Roles a user may be written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "Customer",
            Role::Employee => "Employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Customer" => Ok(Role::Customer),
            "Employee" => Ok(Role::Employee),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// A single named field-validation failure.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Problem {
    pub name: String,
    pub description: String,
}

impl Problem {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

// Response DTOs for general use across services
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OutputUser {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub user_id: i32,
}

impl From<User> for OutputUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            user_id: user.user_id,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ResponseUser {
    pub user: OutputUser,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ResponseUsers {
    pub users: Vec<OutputUser>,
}

impl From<Vec<User>> for ResponseUsers {
    fn from(users: Vec<User>) -> Self {
        Self {
            users: users.into_iter().map(OutputUser::from).collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ResponseMsg {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_errors: Vec<Problem>,
}

impl ErrorResponse {
    pub fn message(error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            validation_errors: Vec::new(),
        }
    }

    pub fn validation(problems: Vec<Problem>) -> Self {
        Self {
            error: None,
            validation_errors: problems,
        }
    }
}

// Queue batch responses
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BatchItemFailure {
    #[serde(rename = "itemIdentifier")]
    pub item_identifier: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchResponse {
    #[serde(rename = "batchItemFailures")]
    pub batch_item_failures: Vec<BatchItemFailure>,
}

impl BatchResponse {
    pub fn fail(&mut self, item_identifier: impl Into<String>) {
        self.batch_item_failures.push(BatchItemFailure {
            item_identifier: item_identifier.into(),
        });
    }
}
