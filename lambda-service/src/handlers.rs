use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::encodings::Body;
use http::StatusCode;
use lambda_runtime::{Error, LambdaEvent};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use user_shared::error::ApiError;
use user_shared::handlers;
use user_shared::models::ErrorResponse;
use user_shared::recovery::{remaining, run_guarded, INTERNAL_ERROR_BODY};
use user_shared::service::UserService;

/// Which operation a deployed function serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Mono-Lambda: picks the operation from the HTTP method
    Api,
    ListUsers,
    UpdateUser,
}

/// Lambda handler function - public for testing
///
/// The invocation runs behind the fault boundary with whatever time the
/// Lambda context has left; a panic or overrun becomes a generic 500.
pub async fn handler<S>(
    event: LambdaEvent<ApiGatewayProxyRequest>,
    route: Route,
    service: Arc<S>,
) -> Result<ApiGatewayProxyResponse, Error>
where
    S: UserService,
{
    let deadline = remaining(event.context.deadline);
    let request = event.payload;

    match run_guarded(dispatch(route, service, request), deadline).await {
        Ok(response) => Ok(response),
        Err(fault) => {
            error!("Request failed: {}", fault);
            Ok(json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_BODY.to_string(),
            ))
        }
    }
}

/// Routes one proxy request to its operation.
pub async fn dispatch<S>(
    route: Route,
    service: Arc<S>,
    request: ApiGatewayProxyRequest,
) -> ApiGatewayProxyResponse
where
    S: UserService,
{
    info!(
        "Received request: route={:?}, method={}, path={:?}",
        route,
        request.http_method.as_str(),
        request.path
    );

    match route {
        Route::ListUsers => list_users(service.as_ref()).await,
        Route::UpdateUser => update_user(service.as_ref(), &request).await,
        Route::Api => match request.http_method.as_str() {
            "GET" => list_users(service.as_ref()).await,
            "POST" => update_user(service.as_ref(), &request).await,
            method => {
                warn!("Unsupported route: method={}, path={:?}", method, request.path);
                encode_response(StatusCode::NOT_FOUND, &ErrorResponse::message("Not Found"))
            }
        },
    }
}

async fn list_users<S>(service: &S) -> ApiGatewayProxyResponse
where
    S: UserService,
{
    match handlers::list_users(service).await {
        Ok(users) => encode_response(StatusCode::OK, &users),
        Err(err) => error_response(&err),
    }
}

async fn update_user<S>(service: &S, request: &ApiGatewayProxyRequest) -> ApiGatewayProxyResponse
where
    S: UserService,
{
    let raw_id = request
        .path_parameters
        .get("ID")
        .map(String::as_str)
        .unwrap_or_default();
    let body = request.body.as_deref().unwrap_or_default();

    match handlers::update_user(service, raw_id, body.as_bytes()).await {
        Ok(user) => encode_response(StatusCode::OK, &user),
        Err(err) => error_response(&err),
    }
}

fn error_response(err: &ApiError) -> ApiGatewayProxyResponse {
    encode_response(err.status(), &err.response())
}

fn encode_response<T: Serialize>(status: StatusCode, data: &T) -> ApiGatewayProxyResponse {
    match serde_json::to_string(data) {
        Ok(body) => json_response(status, body),
        Err(err) => {
            error!("Error while marshaling data: {}", err);
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_BODY.to_string(),
            )
        }
    }
}

fn json_response(status: StatusCode, body: String) -> ApiGatewayProxyResponse {
    let mut response = ApiGatewayProxyResponse {
        status_code: i64::from(status.as_u16()),
        body: Some(Body::Text(body)),
        ..Default::default()
    };
    if let Ok(value) = "application/json".parse() {
        response.headers.insert("content-type", value);
    }
    response
}
