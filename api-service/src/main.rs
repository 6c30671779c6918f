mod error;
mod handlers;
mod lambda;
mod routes;
mod server;

#[cfg(test)]
mod tests;

use anyhow::Context;
use std::sync::Arc;
use user_shared::config::{Config, HttpConfig};
use user_shared::database::{connect, postgres::PgConnector};
use user_shared::logging::{init_tracing, LogFormat};
use user_shared::service::postgres::PgUserService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("[in main]: loading configuration")?;
    let http_config = HttpConfig::from_env().context("[in main]: loading HTTP configuration")?;

    let format = LogFormat::detect();
    init_tracing(&config.log_level, format);
    tracing::info!(
        "Logging initialized at level {} for env {}",
        config.log_level,
        config.env
    );

    let connector = PgConnector::new(config.database());
    let pool = connect(&connector, &config.retry_policy())
        .await
        .context("[in main]: connecting to database")?;
    tracing::info!("Database connection established");

    let service = Arc::new(PgUserService::new(pool.clone()));
    let app = routes::create_router_with_service(service, &http_config);

    let result = if let Ok(function_name) = std::env::var("AWS_LAMBDA_FUNCTION_NAME") {
        tracing::info!(
            "Starting AWS Lambda function: {} (version: {})",
            function_name,
            std::env::var("AWS_LAMBDA_FUNCTION_VERSION").unwrap_or_else(|_| "unknown".into())
        );
        lambda::serve(app).await.map_err(|err| anyhow::anyhow!(err))
    } else {
        tracing::info!("Starting service in non-Lambda environment");
        server::serve(app, &http_config).await
    };

    pool.close().await;
    tracing::info!("Database connection closed");
    result
}
