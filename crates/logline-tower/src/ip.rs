//! Client address derivation.

use std::net::SocketAddr;

use http::HeaderMap;

/// Header carrying the proxy chain, client first.
pub const HEADER_FORWARDED_FOR: &str = "x-forwarded-for";
/// Header carrying the request correlation id.
pub const HEADER_REQUEST_ID: &str = "x-request-id";

/// Client IP for a request.
///
/// Takes the first comma-separated entry of `x-forwarded-for`, trimmed. When the
/// header is absent or not valid text, falls back to the peer's IP. An empty first
/// entry yields an empty string.
#[must_use]
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    match headers
        .get(HEADER_FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
    {
        Some(forwarded) => {
            let first = forwarded
                .split_once(',')
                .map_or(forwarded, |(first, _)| first);
            Some(first.trim().to_string())
        }
        None => peer.map(|addr| addr.ip().to_string()),
    }
}
