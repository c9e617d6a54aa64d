//! Adapter implementations of the team ports.

pub mod memory;
