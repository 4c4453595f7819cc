// ABOUTME: Binary resource fetching for cover-image inlining.
// ABOUTME: Validates URLs, guards private networks, caps body size, and base64-encodes results.

use std::net::IpAddr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use ipnet::{Ipv4Net, Ipv6Net};

use crate::error::{PrepareError, Result};

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// A fetched binary resource.
#[derive(Debug, Clone)]
pub struct FetchedBinary {
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Check if an IP address is in a private/reserved range.
pub(crate) fn is_private_ip(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(ip) => {
            // RFC1918 private ranges
            let private_10: Ipv4Net = "10.0.0.0/8".parse().unwrap();
            let private_172: Ipv4Net = "172.16.0.0/12".parse().unwrap();
            let private_192: Ipv4Net = "192.168.0.0/16".parse().unwrap();
            // Loopback
            let loopback: Ipv4Net = "127.0.0.0/8".parse().unwrap();
            // Link-local
            let link_local: Ipv4Net = "169.254.0.0/16".parse().unwrap();

            private_10.contains(ip)
                || private_172.contains(ip)
                || private_192.contains(ip)
                || loopback.contains(ip)
                || link_local.contains(ip)
        }
        IpAddr::V6(ip) => {
            if ip.is_loopback() {
                return true;
            }
            // Unique local fc00::/7
            let unique_local: Ipv6Net = "fc00::/7".parse().unwrap();
            // Link-local fe80::/10
            let link_local: Ipv6Net = "fe80::/10".parse().unwrap();

            unique_local.contains(ip) || link_local.contains(ip)
        }
    }
}

async fn check_private_host(url: &str, parsed: &url::Url) -> Result<()> {
    let Some(host) = parsed.host_str() else {
        return Ok(());
    };
    if let Ok(ip) = host.parse::<IpAddr>() {
        if is_private_ip(&ip) {
            return Err(PrepareError::PrivateNetwork(url.to_string()));
        }
        return Ok(());
    }
    // Hostname: resolve and check every address
    let scheme = parsed.scheme();
    let port = parsed
        .port()
        .unwrap_or(if scheme == "https" { 443 } else { 80 });
    let addrs = tokio::net::lookup_host((host, port)).await.map_err(|e| {
        PrepareError::fetch(url, anyhow::anyhow!("DNS lookup failed: {}", e))
    })?;
    for socket_addr in addrs {
        if is_private_ip(&socket_addr.ip()) {
            return Err(PrepareError::PrivateNetwork(url.to_string()));
        }
    }
    Ok(())
}

/// Fetch a binary resource from the given URL.
///
/// Rejects non-http(s) schemes, bodies over [`MAX_CONTENT_LENGTH`], and
/// non-success statuses. Private addresses are blocked unless
/// `allow_private_networks` is set.
pub async fn fetch_binary(
    client: &reqwest::Client,
    url: &str,
    allow_private_networks: bool,
) -> Result<FetchedBinary> {
    if url.is_empty() {
        return Err(PrepareError::invalid_url(url, anyhow::anyhow!("empty URL")));
    }

    let parsed = url::Url::parse(url)
        .map_err(|e| PrepareError::invalid_url(url, anyhow::anyhow!("invalid URL: {}", e)))?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(PrepareError::invalid_url(
            url,
            anyhow::anyhow!("scheme must be http or https"),
        ));
    }

    if !allow_private_networks {
        check_private_host(url, &parsed).await?;
    }

    let response = client.get(url).send().await.map_err(|e| {
        PrepareError::fetch(url, anyhow::anyhow!("request failed: {}", e))
    })?;

    // Check Content-Length before reading the body
    if let Some(len) = response.content_length() {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(PrepareError::fetch(url, anyhow::anyhow!("content too large")));
        }
    }

    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    if !status.is_success() {
        return Err(PrepareError::fetch(
            url,
            anyhow::anyhow!("HTTP status {}", status.as_u16()),
        ));
    }

    let body = response.bytes().await.map_err(|e| {
        PrepareError::fetch(url, anyhow::anyhow!("failed to read body: {}", e))
    })?;

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(PrepareError::fetch(url, anyhow::anyhow!("content too large")));
    }

    Ok(FetchedBinary { content_type, body })
}

/// Encode a fetched resource as a `data:` URL.
///
/// The media type comes from the response content type with any
/// parameters stripped; resources served without one fall back to
/// `application/octet-stream`.
pub fn to_data_url(content_type: Option<&str>, body: &[u8]) -> String {
    let media_type = content_type
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_string())
        .filter(|mt| !mt.is_empty())
        .unwrap_or_else(|| "application/octet-stream".to_string());
    format!("data:{};base64,{}", media_type, STANDARD.encode(body))
}
