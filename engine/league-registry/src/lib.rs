//! League Registry - Namespaced team identities across both leagues
//!
//! Both leagues number their teams from 1, so a native ESPN team id is only
//! unique inside its own league. Every id is tagged with its league exactly
//! once, at ingestion, and travels as a [`TeamId`] from then on.

pub mod registry;
pub mod types;

pub use registry::TeamRegistry;
pub use types::{League, RegistryError, Team, TeamId};
