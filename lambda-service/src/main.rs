use lambda_runtime::Error;
use user_lambda_service::{runtime, Route};

#[tokio::main]
async fn main() -> Result<(), Error> {
    runtime::run(Route::Api).await
}
