//! User identity and global roles.
//!
//! The identity provider authenticates users out of band; this module holds
//! the directory of account records and the global role axis consumed by
//! the role resolver. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
