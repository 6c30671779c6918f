//! Decoding, validation and mapping of untrusted request payloads.
//!
//! Every mutation goes through [`decode_validate_body`]: the payload is parsed
//! into an input shape, every field check runs and reports its problem, and
//! only a clean input is mapped to the domain type.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{BoxError, PipelineError};
use crate::models::{Problem, Role, User};

/// Field-level validation. All checks run; nothing short-circuits.
pub trait Validator {
    fn valid(&self) -> Vec<Problem>;
}

/// Conversion of a validated input into its domain type.
pub trait Mapper<T> {
    type Error: std::error::Error + Send + Sync + 'static;

    fn map_to(self) -> Result<T, Self::Error>;
}

/// Decodes `body` as JSON into `I`, validates it and maps it to `O`.
///
/// Exactly one of decode, validation or mapping failure is reported. A decode
/// failure never reaches validation, and a validation failure never reaches
/// mapping. A `null` body decodes to the default input.
pub fn decode_validate_body<I, O>(body: impl AsRef<[u8]>) -> Result<O, PipelineError>
where
    I: DeserializeOwned + Default + Validator + Mapper<O>,
{
    let input: I = serde_json::from_slice::<Option<I>>(body.as_ref())
        .map_err(PipelineError::Decode)?
        .unwrap_or_default();

    let problems = input.valid();
    if !problems.is_empty() {
        return Err(PipelineError::Invalid {
            input: std::any::type_name::<I>(),
            problems,
        });
    }

    input.map_to().map_err(|err| PipelineError::Mapping {
        input: std::any::type_name::<I>(),
        output: std::any::type_name::<O>(),
        source: BoxError::from(err),
    })
}

/// Request body for creating or updating a user.
///
/// Missing and `null` fields decode to their defaults so that they surface
/// as validation problems instead of a decode error.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct InputUser {
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(deserialize_with = "null_as_default")]
    pub user_id: i64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Validator for InputUser {
    fn valid(&self) -> Vec<Problem> {
        let mut problems = Vec::new();

        if self.first_name.is_empty() {
            problems.push(Problem::new("first_name", "must not be blank"));
        }

        if self.last_name.is_empty() {
            problems.push(Problem::new("last_name", "must not be blank"));
        }

        if self.role.is_empty() {
            problems.push(Problem::new("role", "must not be blank"));
        } else if self.role.parse::<Role>().is_err() {
            problems.push(Problem::new("role", r#"must be "Customer" or "Employee""#));
        }

        // Wording is part of the wire contract.
        if self.user_id < 1 {
            problems.push(Problem::new("user_id", "must be must be greater than zero"));
        }

        problems
    }
}

impl Mapper<User> for InputUser {
    type Error = std::num::TryFromIntError;

    fn map_to(self) -> Result<User, Self::Error> {
        Ok(User {
            id: 0,
            first_name: self.first_name,
            last_name: self.last_name,
            role: self.role,
            user_id: i32::try_from(self.user_id)?,
        })
    }
}
