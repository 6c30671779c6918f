use axum::body::to_bytes;
use axum::response::Response;
use serde_json::Value;

/// Helper function to extract the JSON body of a router response
///
/// Panics with the raw body when it is not JSON, which is what a failing
/// router test wants to see.
pub async fn response_to_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(err) => panic!(
            "response body is not JSON ({}): {}",
            err,
            String::from_utf8_lossy(&bytes)
        ),
    }
}
