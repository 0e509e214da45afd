//! Client IP resolution for click analytics.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

/// Resolves the IP address recorded for a click.
///
/// The socket peer address is authoritative unless the service runs behind
/// a trusted reverse proxy, in which case the first `X-Forwarded-For` entry
/// (then `X-Real-IP`) is used. Forwarding headers are ignored otherwise,
/// since any client can set them.
pub fn resolve_client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy && let Some(ip) = forwarded_ip(headers) {
        return ip.to_string();
    }

    peer.ip().to_string()
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let from_forwarded_for = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok());

    from_forwarded_for.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    })
}
