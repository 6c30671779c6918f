use axum::{
    body::Body,
    extract::Request,
    http::{header, Method, StatusCode},
    middleware,
    response::Response,
    routing::{get, put},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::error::AppError;
use crate::handlers::{health_check, list_users, update_user};
use user_shared::config::HttpConfig;
use user_shared::recovery::{panic_message, INTERNAL_ERROR_BODY};
use user_shared::service::UserService;

/// Creates the HTTP router over a given service implementation
pub fn create_router_with_service<S>(service: Arc<S>, config: &HttpConfig) -> Router
where
    S: UserService,
{
    info!(
        "Setting up API routes (health route: {})",
        config.register_health_route
    );

    let cors_layer = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods([Method::GET, Method::PUT, Method::POST, Method::DELETE])
        .allow_headers(cors::Any)
        .max_age(Duration::from_secs(300));

    // Logging middleware to trace all requests
    async fn logging_middleware(
        req: Request,
        next: axum::middleware::Next,
    ) -> impl axum::response::IntoResponse {
        info!(
            "Router received request: method={}, uri={}",
            req.method(),
            req.uri()
        );
        next.run(req).await
    }

    let mut api_routes = Router::new()
        .route("/user", get(list_users::<S>))
        .route("/user/:id", put(update_user::<S>));

    if config.register_health_route {
        api_routes = api_routes.route("/health-check", get(health_check));
    }

    Router::new()
        .nest("/api", api_routes.with_state(service))
        .fallback(|req: Request| async move {
            AppError::NotFound(format!("{} {}", req.method(), req.uri()))
        })
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    error!("Recovered from panic in handler: {}", panic_message(payload));

    let mut response = Response::new(Body::from(INTERNAL_ERROR_BODY));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    response
}
