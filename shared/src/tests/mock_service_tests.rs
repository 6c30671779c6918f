use std::sync::Arc;

use crate::models::User;
use crate::service::UserService;
use crate::test_utils::mock_user_service::MockUserService;
use crate::test_utils::test_logging::init_test_logging;

fn test_user(first_name: &str, user_id: i32) -> User {
    User {
        id: 0,
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        role: "Customer".to_string(),
        user_id,
    }
}

#[tokio::test]
async fn test_mock_user_service() {
    init_test_logging();

    // Create a mock service
    let service = Arc::new(MockUserService::new());

    // Create two users; ids are assigned in order
    let first = service.create_user(test_user("Ada", 11)).await.unwrap();
    let second = service.create_user(test_user("Grace", 12)).await.unwrap();
    assert_eq!((first, second), (1, 2));
    assert_eq!(service.create_calls(), 2);

    // List them back
    let users = service.list_users().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].first_name, "Ada");
    assert_eq!(users[1].id, 2);

    // Update the second
    let mut changed = test_user("Grace", 12);
    changed.role = "Employee".to_string();
    let updated = service.update_user(second, changed).await.unwrap();
    assert_eq!(updated.id, second);
    assert_eq!(service.users()[1].role, "Employee");

    // Updating an unknown id changes nothing
    let missing = service.update_user(99, test_user("Nobody", 1)).await.unwrap();
    assert_eq!(missing.id, 99);
    assert_eq!(service.users().len(), 2);
    assert_eq!(service.update_calls(), 2);
}

#[tokio::test]
async fn test_mock_failure_is_one_shot() {
    let service = MockUserService::new();
    service.fail_next("too many connections");

    let err = service.list_users().await.unwrap_err();
    assert_eq!(err.operation, "UserService::list_users");
    assert!(err.to_string().contains("too many connections"));

    // The next call succeeds again
    assert!(service.list_users().await.unwrap().is_empty());
    assert_eq!(service.list_calls(), 2);
}

#[tokio::test]
async fn test_mock_panic_is_one_shot() {
    let service = Arc::new(MockUserService::new());
    service.panic_next();

    let panicking = Arc::clone(&service);
    let joined = tokio::spawn(async move { panicking.create_user(test_user("Ada", 1)).await }).await;
    assert!(joined.unwrap_err().is_panic());

    assert_eq!(service.create_user(test_user("Ada", 1)).await.unwrap(), 1);
}
