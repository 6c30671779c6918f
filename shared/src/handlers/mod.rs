//! Request handling common to every HTTP-style transport.
//!
//! Transports extract the raw ID and body, call into here and encode the
//! result; status codes and caller-facing messages come from [`ApiError`].

use tracing::{error, info};

use crate::error::{ApiError, PipelineError};
use crate::models::{OutputUser, ResponseMsg, ResponseUser, ResponseUsers, User};
use crate::requests::{decode_validate_body, InputUser};
use crate::service::UserService;

pub fn health() -> ResponseMsg {
    info!("Health check called");
    ResponseMsg {
        message: "hello world".to_string(),
    }
}

// GET /user
pub async fn list_users<S>(service: &S) -> Result<ResponseUsers, ApiError>
where
    S: UserService + ?Sized,
{
    let users = service.list_users().await.map_err(|err| {
        error!("Error getting all users: {}", err);
        ApiError::ListUsers(err)
    })?;

    Ok(ResponseUsers::from(users))
}

// PUT /user/:id
pub async fn update_user<S>(service: &S, raw_id: &str, body: &[u8]) -> Result<ResponseUser, ApiError>
where
    S: UserService + ?Sized,
{
    let id = raw_id.parse::<i32>().map_err(|source| {
        error!("Error getting ID {:?}: {}", raw_id, source);
        ApiError::InvalidId {
            raw: raw_id.to_string(),
            source,
        }
    })?;

    let user_in = decode_validate_body::<InputUser, User>(body).map_err(|err| {
        match &err {
            PipelineError::Invalid { problems, .. } => {
                error!("Problems validating input: {}; problems={:?}", err, problems)
            }
            _ => error!("Body parser error: {}", err),
        }
        ApiError::from(err)
    })?;

    let user = service.update_user(id, user_in).await.map_err(|err| {
        error!("Error updating object in database: {}", err);
        ApiError::UpdateUser(err)
    })?;

    Ok(ResponseUser {
        user: OutputUser::from(user),
    })
}
