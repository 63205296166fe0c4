//! HTTP access for the portal client.
//!
//! [`PortalClient`](super::PortalClient) only talks to the network through
//! [`HttpTransport`], so tests can hand it a fake. [`ReqwestTransport`] is
//! the real implementation.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};

use crate::errors::{CristieError, CristieResult, TransportError, TransportErrorKind};

/// Status and body of a fully read response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// A response body read chunk by chunk.
pub trait ByteStream: Send {
    /// Next chunk, or `None` once the body is exhausted.
    fn next_chunk(&mut self) -> impl Future<Output = Result<Option<Vec<u8>>, TransportError>> + Send;
}

/// The HTTP calls the portal client needs.
pub trait HttpTransport: Send + Sync {
    type Stream: ByteStream;

    /// POST a JSON body.
    fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;

    /// GET, optionally with a bearer token.
    fn get(
        &self,
        url: &str,
        bearer: Option<&str>,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;

    /// GET and stream the body. A non-success status is an
    /// [`TransportErrorKind::Http`] error.
    fn get_stream(&self, url: &str)
        -> impl Future<Output = Result<Self::Stream, TransportError>> + Send;
}

/// [`HttpTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(connect_timeout: Duration) -> CristieResult<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| CristieError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    async fn read(request: RequestBuilder) -> Result<HttpResponse, TransportError> {
        let resp = request.send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

impl HttpTransport for ReqwestTransport {
    type Stream = ReqwestStream;

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError> {
        tracing::debug!(url, "POST");
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(body);
        Self::read(request).await
    }

    async fn get(&self, url: &str, bearer: Option<&str>) -> Result<HttpResponse, TransportError> {
        tracing::debug!(url, authenticated = bearer.is_some(), "GET");
        let mut request = self.client.get(url);
        if let Some(token) = bearer {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        Self::read(request).await
    }

    async fn get_stream(&self, url: &str) -> Result<ReqwestStream, TransportError> {
        tracing::debug!(url, "GET (streaming)");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::new(
                TransportErrorKind::Http,
                format!("server returned HTTP {status}"),
            ));
        }
        Ok(ReqwestStream { response })
    }
}

/// Streaming body of a `reqwest` response.
#[derive(Debug)]
pub struct ReqwestStream {
    response: Response,
}

impl ByteStream for ReqwestStream {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        let chunk = self.response.chunk().await?;
        Ok(chunk.map(|bytes| bytes.to_vec()))
    }
}
