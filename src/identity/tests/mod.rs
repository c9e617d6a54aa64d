//! Unit and service tests for the identity module.

mod service_tests;
