//! Unit and service tests for the team module.
