mod create_users_tests;
