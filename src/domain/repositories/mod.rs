//! Storage ports.
//!
//! Implemented by [`crate::infrastructure::persistence`] in production and by
//! `mockall` mocks in unit tests.

pub mod link_repository;
pub mod stats_repository;
pub mod token_repository;

pub use link_repository::LinkRepository;
pub use stats_repository::{LinkStats, StatsRepository};
pub use token_repository::{ApiToken, TokenRepository};

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use stats_repository::MockStatsRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
