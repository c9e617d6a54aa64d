//! Adapter implementations of the activity ports.

pub mod memory;
