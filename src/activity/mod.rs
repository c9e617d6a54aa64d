//! Activities: Divisions and Projects that group tasks under a team,
//! each carrying a chat-style message stream used both by members and
//! by the engine's system notices. The module also owns the audit-trail
//! and notification ports every other service emits through.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
