//! In-memory adapters for the team module.

mod team;

pub use team::InMemoryTeamRepository;
