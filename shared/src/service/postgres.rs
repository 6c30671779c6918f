use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{Result, StoreError};
use crate::models::User;

/// Postgres-backed user service over a shared connection pool
#[derive(Clone)]
pub struct PgUserService {
    pool: PgPool,
}

impl PgUserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl super::UserService for PgUserService {
    async fn list_users(&self) -> Result<Vec<User>> {
        sqlx::query_as::<_, User>(r#"SELECT * FROM "users""#)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::new("UserService::list_users", e))
    }

    async fn update_user(&self, id: i32, mut user: User) -> Result<User> {
        sqlx::query(
            r#"
            UPDATE
                "users"
            SET
                "first_name" = $1,
                "last_name" = $2,
                "role" = $3,
                "user_id" = $4
            WHERE
                "id" = $5
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.role)
        .bind(user.user_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::new("UserService::update_user", e))?;

        user.id = id;
        Ok(user)
    }

    async fn create_user(&self, user: User) -> Result<i32> {
        sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO "users" ("first_name", "last_name", "role", "user_id")
                VALUES ($1, $2, $3, $4)
            RETURNING "id"
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.role)
        .bind(user.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::new("UserService::create_user", e))
    }
}
