//! Sub-category catalog seeding and selection for topic discovery.
//!
//! - [`domain`]: categories, sub-categories, user selections and the
//!   services that seed, resolve and update them.
//! - [`outbound`]: PostgreSQL, in-memory and random-source adapters.
//! - [`bootstrap`]: configuration and startup seeding.

pub mod bootstrap;
pub mod domain;
pub mod outbound;
