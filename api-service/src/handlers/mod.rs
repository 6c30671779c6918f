//! Axum extractors around the shared request handlers.

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use user_shared::handlers;
use user_shared::models::{ResponseMsg, ResponseUser, ResponseUsers};
use user_shared::service::UserService;

use crate::error::Result;

// GET /api/health-check
pub async fn health_check() -> Json<ResponseMsg> {
    Json(handlers::health())
}

// GET /api/user
pub async fn list_users<S>(State(service): State<Arc<S>>) -> Result<Json<ResponseUsers>>
where
    S: UserService,
{
    let users = handlers::list_users(service.as_ref()).await?;
    Ok(Json(users))
}

// PUT /api/user/:id
pub async fn update_user<S>(
    State(service): State<Arc<S>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ResponseUser>>
where
    S: UserService,
{
    let user = handlers::update_user(service.as_ref(), &id, &body).await?;
    Ok(Json(user))
}
