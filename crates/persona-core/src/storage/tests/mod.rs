mod local_tests;
mod manager_tests;
