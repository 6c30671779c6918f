use axum::{body::Body, http::Request, Router};
use std::sync::Arc;
use std::time::Duration;
use user_shared::config::HttpConfig;
use user_shared::models::User;
use user_shared::service::UserService;
use user_shared::test_utils::mock_user_service::MockUserService;

use crate::routes;

pub fn test_http_config() -> HttpConfig {
    HttpConfig {
        domain: "127.0.0.1".to_string(),
        port: 0,
        shutdown_duration: Duration::from_secs(1),
        request_timeout: Duration::from_secs(5),
        register_health_route: true,
    }
}

pub fn create_test_users() -> Vec<User> {
    vec![
        User {
            id: 1,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            role: "Customer".to_string(),
            user_id: 1001,
        },
        User {
            id: 2,
            first_name: "Jane".to_string(),
            last_name: "Smith".to_string(),
            role: "Employee".to_string(),
            user_id: 1002,
        },
    ]
}

// Helper for setting up a test router over the mock service
pub fn create_test_app() -> (Router, Arc<MockUserService>) {
    let service = Arc::new(MockUserService::with_data(create_test_users()));
    let app = create_app_with(service.clone(), &test_http_config());
    (app, service)
}

pub fn create_app_with<S: UserService>(service: Arc<S>, config: &HttpConfig) -> Router {
    routes::create_router_with_service(service, config)
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
