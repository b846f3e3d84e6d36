//! Bearer token gate, per-IP rate limits and request spans.

pub mod auth;
pub mod rate_limit;
pub mod tracing;
