mod lock_tests;
