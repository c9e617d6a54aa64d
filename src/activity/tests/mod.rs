//! Unit and service tests for the activity module.

mod domain_tests;
mod service_tests;
