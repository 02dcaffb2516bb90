mod json_repository_tests;
mod concurrency_tests;
