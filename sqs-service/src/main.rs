use aws_lambda_events::event::sqs::{SqsEvent, SqsMessage};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use std::sync::Arc;
use tracing::{error, info};
use user_shared::config::Config;
use user_shared::database::{connect, postgres::PgConnector};
use user_shared::logging::{init_tracing, LogFormat};
use user_shared::models::{BatchResponse, User};
use user_shared::recovery::{remaining, run_guarded};
use user_shared::requests::{decode_validate_body, InputUser};
use user_shared::service::{postgres::PgUserService, UserService};

mod errors;

#[cfg(test)]
mod tests;

use crate::errors::RecordError;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::load()?;
    init_tracing(&config.log_level, LogFormat::Json);

    info!("Starting create-users SQS Lambda (env: {})", config.env);

    let connector = PgConnector::new(config.database());
    let pool = connect(&connector, &config.retry_policy()).await?;
    let service = Arc::new(PgUserService::new(pool.clone()));

    // Run the Lambda service function with the service
    let result = lambda_runtime::run(service_fn(|event| handler(event, service.clone()))).await;

    pool.close().await;
    result
}

// Lambda handler function - public for testing
//
// Records are handled one at a time in arrival order. A record that fails for
// any reason is reported back so SQS redelivers only that message.
pub async fn handler<S>(event: LambdaEvent<SqsEvent>, service: Arc<S>) -> Result<BatchResponse, Error>
where
    S: UserService,
{
    let deadline_ms = event.context.deadline;
    let records = event.payload.records;
    info!("Processing {} SQS records", records.len());

    let mut response = BatchResponse::default();
    for record in records {
        let message_id = record.message_id.clone().unwrap_or_default();

        match process_record(record, service.clone(), deadline_ms).await {
            Ok(id) => info!("Created user {} from message {}", id, message_id),
            Err(err) => {
                error!("Message {} failed: {}", message_id, err);
                response.fail(message_id);
            }
        }
    }

    if !response.batch_item_failures.is_empty() {
        info!(
            "Reporting {} batch item failures",
            response.batch_item_failures.len()
        );
    }
    Ok(response)
}

async fn process_record<S>(
    record: SqsMessage,
    service: Arc<S>,
    deadline_ms: u64,
) -> Result<i32, RecordError>
where
    S: UserService,
{
    let body = record.body.unwrap_or_default();

    let work = async move {
        let user = decode_validate_body::<InputUser, User>(&body)?;
        Ok::<_, RecordError>(service.create_user(user).await?)
    };

    run_guarded(work, remaining(deadline_ms)).await?
}
