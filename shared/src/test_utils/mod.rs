pub mod http_test_utils;
pub mod mock_user_service;
pub mod postgres_test_utils;
pub mod test_logging;
