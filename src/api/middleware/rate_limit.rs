//! Per-IP rate limiting using the token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder, key_extractor::KeyExtractor};

/// Token bucket parameters for one group of routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub per_second: u64,
    pub burst_size: u32,
}

/// Redirects: 2 requests per second, burst of 100.
pub const PUBLIC: RateLimit = RateLimit {
    per_second: 2,
    burst_size: 100,
};

/// Authenticated API: 1 request per second, burst of 10.
pub const SECURE: RateLimit = RateLimit {
    per_second: 1,
    burst_size: 10,
};

/// Builds a rate limiter keyed by `key_extractor`.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Use `PeerIpKeyExtractor` when clients connect directly, and
/// `SmartIpKeyExtractor` (`X-Forwarded-For` / `X-Real-IP`) only behind a
/// trusted reverse proxy.
pub fn layer<K>(
    key_extractor: K,
    limit: RateLimit,
) -> GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>
where
    K: KeyExtractor,
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(key_extractor)
            .per_second(limit.per_second)
            .burst_size(limit.burst_size)
            .finish()
            .expect("rate limit values are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
