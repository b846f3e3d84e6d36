//! Adapters behind the domain ports: PostgreSQL, Redis and the local
//! artifact directory.

pub mod artifacts;
pub mod cache;
pub mod persistence;
