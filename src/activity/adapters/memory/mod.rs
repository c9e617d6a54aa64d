//! In-memory adapters for the activity module.

mod hub;

pub use hub::InMemoryActivityHub;
