mod mock_service_tests;
