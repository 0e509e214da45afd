//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// One request is replenished per interval, 2 per second sustained.
const REPLENISH_INTERVAL_MS: u64 = 500;
/// Requests a client may burst before throttling starts.
const BURST_SIZE: u32 = 50;

/// Creates a rate limiter for the API keyed by the socket peer address.
///
/// # Limits
///
/// - **Rate**: 2 requests per second (one every 500 ms)
/// - **Burst**: 50 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
/// The redirect route is never limited.
///
/// # Example
///
/// ```rust,ignore
/// let api = Router::new()
///     .route("/links", post(create_link_handler))
///     .layer(rate_limit::layer());
/// ```
pub fn layer() -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>
{
    let config = GovernorConfigBuilder::default()
        .per_millisecond(REPLENISH_INTERVAL_MS)
        .burst_size(BURST_SIZE)
        .finish();

    GovernorLayer::new(Arc::new(expect_valid(config)))
}

/// Same limits as [`layer`], keyed by `X-Forwarded-For` / `X-Real-IP` /
/// `Forwarded` with the peer address as fallback.
///
/// Use only behind a trusted reverse proxy; otherwise clients can pick
/// their own key.
pub fn proxy_layer()
-> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let config = GovernorConfigBuilder::default()
        .per_millisecond(REPLENISH_INTERVAL_MS)
        .burst_size(BURST_SIZE)
        .key_extractor(SmartIpKeyExtractor)
        .finish();

    GovernorLayer::new(Arc::new(expect_valid(config)))
}

fn expect_valid<K: KeyExtractor>(
    config: Option<GovernorConfig<K, NoOpMiddleware<QuantaInstant>>>,
) -> GovernorConfig<K, NoOpMiddleware<QuantaInstant>> {
    match config {
        Some(config) => config,
        // finish() only fails for a zero period or burst
        None => unreachable!("rate limit constants are non-zero"),
    }
}
