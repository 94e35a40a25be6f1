//! HTTP transport capability for range-dl
//!
//! The stepper talks to the network through the narrow [`HttpTransport`]
//! trait: a HEAD probe and a GET carrying a `Range` header. The production
//! implementation rides on a shared optimized `reqwest` client; tests swap
//! in an in-memory transport.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use once_cell::sync::Lazy;
use reqwest::header::{HeaderMap, RANGE};
use reqwest::{Client, ClientBuilder};

use crate::core::error::Result;

/// Global HTTP client with optimizations
static GLOBAL_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .tcp_keepalive(Duration::from_secs(60))
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(4)
        .timeout(Duration::from_secs(30)) // Overall request timeout
        .connect_timeout(Duration::from_secs(10)) // Connection timeout
        .user_agent(concat!("range-dl/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to create HTTP client")
});

/// Status and headers of a HEAD response
#[derive(Debug, Clone)]
pub struct HeadResponse {
    pub status: u16,
    pub headers: HeaderMap,
}

/// One partial-request response: status, headers, and the chunk body
#[derive(Debug, Clone)]
pub struct ChunkResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// The two operations the stepper needs from an HTTP stack.
///
/// Transport errors surface as `Error::NetworkError` or `Error::HttpError`;
/// the stepper never retries and never interprets status codes.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issues a HEAD request against the resource.
    async fn head(&self, url: &str) -> Result<HeadResponse>;

    /// Issues a GET with the given `Range` header value and reads the body.
    async fn get(&self, url: &str, range: &str) -> Result<ChunkResponse>;
}

/// Production transport backed by the shared `reqwest` client
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestTransport;

impl ReqwestTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn head(&self, url: &str) -> Result<HeadResponse> {
        let response = GLOBAL_CLIENT.head(url).send().await?;

        Ok(HeadResponse {
            status: response.status().as_u16(),
            headers: response.headers().clone(),
        })
    }

    async fn get(&self, url: &str, range: &str) -> Result<ChunkResponse> {
        let response = GLOBAL_CLIENT.get(url).header(RANGE, range).send().await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(ChunkResponse {
            status,
            headers,
            body,
        })
    }
}
