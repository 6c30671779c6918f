use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use sqlx::Connection;

use super::Connect;
use crate::config::DatabaseConfig;

/// Opens a pooled Postgres connection described by a [`DatabaseConfig`].
pub struct PgConnector {
    options: PgConnectOptions,
    max_connections: u32,
}

impl PgConnector {
    pub fn new(config: &DatabaseConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name)
            .ssl_mode(PgSslMode::Disable);

        Self {
            options,
            max_connections: config.max_connections,
        }
    }
}

#[async_trait]
impl Connect for PgConnector {
    type Handle = PgPool;
    type Error = sqlx::Error;

    async fn open(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(self.options.clone())
            .await
    }

    async fn ping(&self, pool: &PgPool) -> Result<(), sqlx::Error> {
        let mut conn = pool.acquire().await?;
        conn.ping().await
    }

    async fn close(&self, pool: PgPool) {
        pool.close().await;
    }
}
