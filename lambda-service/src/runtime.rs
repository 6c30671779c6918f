use lambda_runtime::{service_fn, Error};
use std::sync::Arc;
use tracing::info;
use user_shared::config::Config;
use user_shared::database::{connect, postgres::PgConnector};
use user_shared::logging::{init_tracing, LogFormat};
use user_shared::service::postgres::PgUserService;

use crate::handlers::{handler, Route};

/// Connects to the database and serves `route` until the runtime stops
pub async fn run(route: Route) -> Result<(), Error> {
    let config = Config::load()?;
    init_tracing(&config.log_level, LogFormat::Json);

    info!(
        "Starting {:?} Lambda: {} (env: {})",
        route,
        std::env::var("AWS_LAMBDA_FUNCTION_NAME").unwrap_or_else(|_| "local".into()),
        config.env
    );

    let connector = PgConnector::new(config.database());
    let pool = connect(&connector, &config.retry_policy()).await?;
    let service = Arc::new(PgUserService::new(pool.clone()));

    // Run the Lambda service function with the service
    let result = lambda_runtime::run(service_fn(|event| handler(event, route, service.clone()))).await;

    pool.close().await;
    info!("Lambda function completed");
    result
}
