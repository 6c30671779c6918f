use tracing_subscriber::EnvFilter;

/// Output shape of the process log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable lines, used for the local HTTP server
    Text,
    /// One JSON object per line, used on Lambda so CloudWatch can index fields
    Json,
}

impl LogFormat {
    /// JSON when running inside Lambda, text otherwise
    pub fn detect() -> Self {
        if std::env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok() {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Initialize the global tracing subscriber
///
/// RUST_LOG wins when set; otherwise `level` (LOG_LEVEL) is used. Calling this
/// twice is harmless.
pub fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false) // No ANSI colors in CloudWatch
        .with_target(true); // Include the target (module path) in logs

    let installed = match format {
        // CloudWatch adds the ingestion time
        LogFormat::Json => builder.json().without_time().try_init(),
        LogFormat::Text => builder.try_init(),
    };

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_lambda_environment() {
        temp_env::with_var("AWS_LAMBDA_FUNCTION_NAME", Some("list-users"), || {
            assert_eq!(LogFormat::detect(), LogFormat::Json);
        });
        temp_env::with_var("AWS_LAMBDA_FUNCTION_NAME", None::<&str>, || {
            assert_eq!(LogFormat::detect(), LogFormat::Text);
        });
    }

    #[test]
    fn second_init_does_not_panic() {
        init_tracing("debug", LogFormat::Text);
        init_tracing("info", LogFormat::Json);
    }
}
