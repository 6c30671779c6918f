use axum::{body::Body, extract::Request, response::Response, Router};
use lambda_http::{
    run, service_fn, Body as LambdaBody, Error, Request as LambdaRequest,
    Response as LambdaResponse,
};
use tower::ServiceExt;

/// Serves the router as an API Gateway proxy Lambda
pub async fn serve(app: Router) -> Result<(), Error> {
    run(service_fn(move |event| function_handler(app.clone(), event))).await
}

// The Lambda handler function
async fn function_handler(
    app: Router,
    event: LambdaRequest,
) -> Result<LambdaResponse<LambdaBody>, Error> {
    tracing::info!(
        "Received Lambda request: method={:?}, path={:?}",
        event.method(),
        event.uri().path()
    );

    // Convert the Lambda event to an HTTP request for Axum
    let (parts, body) = event.into_parts();
    let body = match body {
        LambdaBody::Empty => Body::empty(),
        LambdaBody::Text(text) => Body::from(text),
        LambdaBody::Binary(data) => Body::from(data),
    };

    let response = match app.oneshot(Request::from_parts(parts, body)).await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!("Error from Axum router: {:?}", err);
            return Err(err.into());
        }
    };

    let lambda_response = response_to_lambda(response).await?;
    tracing::info!(
        "Returning Lambda response: status={}",
        lambda_response.status()
    );

    Ok(lambda_response)
}

// Convert the Axum response to a format suitable for Lambda
async fn response_to_lambda(response: Response) -> Result<LambdaResponse<LambdaBody>, Error> {
    let (parts, body) = response.into_parts();

    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!("Failed to read response body: {:?}", err);
            return Err(err.into());
        }
    };

    let builder = parts
        .headers
        .iter()
        .fold(LambdaResponse::builder().status(parts.status), |builder, (name, value)| {
            builder.header(name.as_str(), value.as_bytes())
        });

    let lambda_response = if bytes.is_empty() {
        builder.body(LambdaBody::Empty)?
    } else {
        // Every body this router writes is JSON text
        match String::from_utf8(bytes.to_vec()) {
            Ok(text) => builder.body(LambdaBody::Text(text))?,
            Err(err) => builder.body(LambdaBody::Binary(err.into_bytes()))?,
        }
    };

    Ok(lambda_response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;

    #[tokio::test]
    async fn converts_json_response_to_text_body() {
        let response = Response::builder()
            .status(StatusCode::OK)
            .header("content-type", "application/json")
            .body(Body::from(r#"{"message":"hello world"}"#))
            .unwrap();

        let lambda_response = response_to_lambda(response).await.unwrap();

        assert_eq!(lambda_response.status(), StatusCode::OK);
        assert_eq!(
            lambda_response.headers()["content-type"],
            "application/json"
        );
        match lambda_response.body() {
            LambdaBody::Text(text) => assert_eq!(text, r#"{"message":"hello world"}"#),
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[tokio::test]
    async fn routes_lambda_event_through_router() {
        let app = Router::new().route("/api/ping", get(|| async { "pong" }));
        let event = lambda_http::http::Request::builder()
            .method("GET")
            .uri("/api/ping")
            .body(LambdaBody::Empty)
            .unwrap();

        let response = function_handler(app, event).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(matches!(response.body(), LambdaBody::Text(text) if text == "pong"));
    }
}
