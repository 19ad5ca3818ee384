//! The HTTP boundary.
//!
//! [`Transport`] takes a fully signed request and returns the raw response.
//! Status handling and decoding happen above it, so an implementation only
//! moves bytes.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use tracing::debug;

use crate::error::DynoError;

/// Future returned by [`Transport::send`].
pub type TransportFuture =
    Pin<Box<dyn Future<Output = Result<http::Response<Bytes>, DynoError>> + Send>>;

/// Sends signed requests.
///
/// Implementations must be safe to share across tasks; the client issues
/// requests concurrently through one instance.
pub trait Transport: Send + Sync + 'static {
    /// Send a request and return the response, whatever its status.
    fn send(&self, request: http::Request<Bytes>) -> TransportFuture;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport that gives up on a request after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, DynoError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DynoError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: http::Request<Bytes>) -> TransportFuture {
        let client = self.client.clone();
        Box::pin(async move {
            let (parts, body) = request.into_parts();
            let response = client
                .request(parts.method, parts.uri.to_string())
                .headers(parts.headers)
                .body(body)
                .send()
                .await
                .map_err(map_reqwest_error)?;

            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await.map_err(map_reqwest_error)?;
            debug!(status = status.as_u16(), bytes = body.len(), "received response");

            let mut builder = http::Response::builder().status(status);
            if let Some(h) = builder.headers_mut() {
                *h = headers;
            }
            builder
                .body(body)
                .map_err(|e| DynoError::Network(e.to_string()))
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> DynoError {
    if err.is_timeout() {
        DynoError::Timeout
    } else {
        DynoError::Network(err.to_string())
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! A transport that records requests and replays canned responses.

    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use super::*;

    /// One scripted outcome.
    pub(crate) enum Reply {
        Response(u16, String),
        Timeout,
    }

    /// What the mock saw of a request.
    #[derive(Debug, Clone)]
    pub(crate) struct Recorded {
        pub(crate) uri: http::Uri,
        pub(crate) headers: http::HeaderMap,
        pub(crate) body: Bytes,
    }

    #[derive(Clone, Default)]
    pub(crate) struct MockTransport {
        replies: Arc<Mutex<VecDeque<Reply>>>,
        requests: Arc<Mutex<Vec<Recorded>>>,
    }

    impl MockTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn reply(&self, status: u16, body: impl Into<String>) -> &Self {
            self.replies
                .lock()
                .unwrap()
                .push_back(Reply::Response(status, body.into()));
            self
        }

        pub(crate) fn time_out(&self) -> &Self {
            self.replies.lock().unwrap().push_back(Reply::Timeout);
            self
        }

        pub(crate) fn requests(&self) -> Vec<Recorded> {
            self.requests.lock().unwrap().clone()
        }

        /// Request bodies parsed as JSON, in send order.
        pub(crate) fn bodies(&self) -> Vec<serde_json::Value> {
            self.requests()
                .iter()
                .map(|r| serde_json::from_slice(&r.body).unwrap())
                .collect()
        }
    }

    impl Transport for MockTransport {
        fn send(&self, request: http::Request<Bytes>) -> TransportFuture {
            let (parts, body) = request.into_parts();
            self.requests.lock().unwrap().push(Recorded {
                uri: parts.uri,
                headers: parts.headers,
                body,
            });
            let reply = self.replies.lock().unwrap().pop_front();
            Box::pin(async move {
                match reply {
                    Some(Reply::Response(status, body)) => Ok(http::Response::builder()
                        .status(status)
                        .body(Bytes::from(body))
                        .unwrap()),
                    Some(Reply::Timeout) => Err(DynoError::Timeout),
                    None => Err(DynoError::Network("no scripted response".to_owned())),
                }
            })
        }
    }
}
