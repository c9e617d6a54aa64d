//! Teams: the membership boundary every authorization decision is
//! scoped to.
//!
//! A team is created pending and must be approved by a global admin
//! before its tasks become visible. Membership carries a team-scoped
//! role which combines with the member's global role into an
//! [`domain::EffectiveRole`], the input to every privilege check in the
//! engine.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
