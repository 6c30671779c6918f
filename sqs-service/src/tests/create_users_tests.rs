use aws_lambda_events::event::sqs::{SqsEvent, SqsMessage};
use lambda_runtime::LambdaEvent;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use user_shared::error::Result as StoreResult;
use user_shared::models::User;
use user_shared::service::UserService;
use user_shared::test_utils::mock_user_service::MockUserService;
use user_shared::test_utils::test_logging;

use crate::handler;

fn create_message(message_id: &str, body: serde_json::Value) -> SqsMessage {
    SqsMessage {
        message_id: Some(message_id.to_string()),
        body: Some(body.to_string()),
        ..Default::default()
    }
}

fn create_event(records: Vec<SqsMessage>) -> LambdaEvent<SqsEvent> {
    LambdaEvent {
        payload: SqsEvent { records },
        context: lambda_runtime::Context::default(),
    }
}

fn valid_user(first_name: &str, user_id: i64) -> serde_json::Value {
    json!({"first_name": first_name, "last_name": "Doe", "role": "Customer", "user_id": user_id})
}

fn failed_ids(response: &user_shared::models::BatchResponse) -> Vec<&str> {
    response
        .batch_item_failures
        .iter()
        .map(|failure| failure.item_identifier.as_str())
        .collect()
}

#[tokio::test]
async fn test_all_records_created() {
    test_logging::init_test_logging();
    let service = Arc::new(MockUserService::new());
    let event = create_event(vec![
        create_message("msg-1", valid_user("John", 1001)),
        create_message("msg-2", valid_user("Jane", 1002)),
    ]);

    let response = handler(event, service.clone()).await.unwrap();

    assert!(response.batch_item_failures.is_empty());
    assert_eq!(service.create_calls(), 2);
    let users = service.users();
    assert_eq!(users[0].first_name, "John");
    assert_eq!(users[1].first_name, "Jane");
    assert_eq!(serde_json::to_value(&response).unwrap(), json!({"batchItemFailures": []}));
}

#[tokio::test]
async fn test_invalid_record_is_reported_and_batch_continues() {
    let service = Arc::new(MockUserService::new());
    let event = create_event(vec![
        create_message("msg-1", json!({"first_name": "John", "role": "Customer"})),
        create_message("msg-2", valid_user("Jane", 1002)),
    ]);

    let response = handler(event, service.clone()).await.unwrap();

    assert_eq!(failed_ids(&response), vec!["msg-1"]);
    assert_eq!(service.create_calls(), 1);
    assert_eq!(service.users()[0].first_name, "Jane");
}

#[tokio::test]
async fn test_malformed_body_is_reported() {
    let service = Arc::new(MockUserService::new());
    let mut broken = create_message("msg-1", json!({}));
    broken.body = Some("{not json".to_string());
    let event = create_event(vec![broken, create_message("msg-2", valid_user("Jane", 1002))]);

    let response = handler(event, service.clone()).await.unwrap();

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"batchItemFailures": [{"itemIdentifier": "msg-1"}]})
    );
    assert_eq!(service.create_calls(), 1);
}

#[tokio::test]
async fn test_store_failure_is_reported() {
    let service = Arc::new(MockUserService::new());
    service.fail_next("duplicate key value");
    let event = create_event(vec![
        create_message("msg-1", valid_user("John", 1001)),
        create_message("msg-2", valid_user("Jane", 1002)),
        create_message("msg-3", valid_user("Jim", 1003)),
    ]);

    let response = handler(event, service.clone()).await.unwrap();

    assert_eq!(failed_ids(&response), vec!["msg-1"]);
    assert_eq!(service.create_calls(), 3);
    assert_eq!(service.users().len(), 2);
}

#[tokio::test]
async fn test_panic_only_fails_its_own_record() {
    let service = Arc::new(MockUserService::new());
    service.panic_next();
    let event = create_event(vec![
        create_message("msg-1", valid_user("John", 1001)),
        create_message("msg-2", valid_user("Jane", 1002)),
    ]);

    let response = handler(event, service.clone()).await.unwrap();

    assert_eq!(failed_ids(&response), vec!["msg-1"]);
    assert_eq!(service.users().len(), 1);
    assert_eq!(service.users()[0].first_name, "Jane");
}

#[tokio::test]
async fn test_empty_batch() {
    let service = Arc::new(MockUserService::new());

    let response = handler(create_event(Vec::new()), service.clone()).await.unwrap();

    assert!(response.batch_item_failures.is_empty());
    assert_eq!(service.create_calls(), 0);
}

/// Service whose inserts outlive the invocation deadline
struct SlowService;

#[async_trait::async_trait]
impl UserService for SlowService {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(Vec::new())
    }

    async fn update_user(&self, id: i32, mut user: User) -> StoreResult<User> {
        user.id = id;
        Ok(user)
    }

    async fn create_user(&self, _user: User) -> StoreResult<i32> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(1)
    }
}

#[tokio::test]
async fn test_deadline_fails_remaining_records() {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();
    let mut context = lambda_runtime::Context::default();
    context.deadline = (now + Duration::from_millis(50)).as_millis() as u64;
    let event = LambdaEvent {
        payload: SqsEvent {
            records: vec![
                create_message("msg-1", valid_user("John", 1001)),
                create_message("msg-2", valid_user("Jane", 1002)),
            ],
        },
        context,
    };

    let response = handler(event, Arc::new(SlowService)).await.unwrap();

    assert_eq!(failed_ids(&response), vec!["msg-1", "msg-2"]);
}
