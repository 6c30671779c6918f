//! # Postgres test utilities
//!
//! Integration tests against a real database only run when `USE_POSTGRES=true`.
//! Connection settings come from the usual `DATABASE_*` variables with local
//! defaults, e.g. a `postgres:16` container on port 5432.

use log::{debug, info};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

const CREATE_USERS_TABLE: &str = include_str!("../../sql/create_users.sql");

// Helper to check if Postgres integration tests should be used
pub fn use_postgres() -> bool {
    std::env::var("USE_POSTGRES").unwrap_or_default() == "true"
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

// Helper to open a small pool against the local test database
pub async fn create_test_pool() -> PgPool {
    let options = PgConnectOptions::new()
        .host(&var_or("DATABASE_HOST", "localhost"))
        .port(var_or("DATABASE_PORT", "5432").parse().unwrap_or(5432))
        .username(&var_or("DATABASE_USER", "postgres"))
        .password(&var_or("DATABASE_PASSWORD", "postgres"))
        .database(&var_or("DATABASE_NAME", "users"));

    PgPoolOptions::new()
        .max_connections(2)
        .connect_with(options)
        .await
        .expect("Failed to connect to test database")
}

// Helper to create the users table and empty it
pub async fn reset_users_table(pool: &PgPool) {
    info!("Preparing users table");
    sqlx::query(CREATE_USERS_TABLE)
        .execute(pool)
        .await
        .expect("Failed to create users table");
    sqlx::query(r#"TRUNCATE "users" RESTART IDENTITY"#)
        .execute(pool)
        .await
        .expect("Failed to truncate users table");
    debug!("Users table is empty");
}
