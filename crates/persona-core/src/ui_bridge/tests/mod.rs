mod messages_tests;
