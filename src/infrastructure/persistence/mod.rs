//! PostgreSQL adapters, written with runtime `query_as` and `FromRow` rows.
//!
//! Unique violations are classified by constraint name in
//! [`crate::utils::db_error`].

pub mod pg_link_repository;
pub mod pg_stats_repository;
pub mod pg_token_repository;

pub use pg_link_repository::PgLinkRepository;
pub use pg_stats_repository::PgStatsRepository;
pub use pg_token_repository::PgTokenRepository;
