//! One signed JSON round-trip.
//!
//! [`Connection`] owns everything a request needs that does not change
//! between calls: the transport, the resolved credentials, the region and
//! the endpoint. It is cheap to clone and safe to share across tasks.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use dyno_auth::{Credentials, SigningContext};
use dyno_model::{DynoOperation, ServiceErrorBody};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{DynoError, Result};
use crate::request::{Endpoint, SERVICE, build_request, redacted_headers};
use crate::transport::Transport;

/// A configured connection to the service.
#[derive(Clone)]
pub struct Connection {
    transport: Arc<dyn Transport>,
    credentials: Arc<Credentials>,
    region: String,
    endpoint: Endpoint,
    log_bodies: bool,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("credentials", &self.credentials)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("log_bodies", &self.log_bodies)
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Create a connection. `log_bodies` emits request and response bodies
    /// at debug level.
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<Credentials>,
        region: impl Into<String>,
        endpoint: Endpoint,
        log_bodies: bool,
    ) -> Self {
        Self {
            transport,
            credentials,
            region: region.into(),
            endpoint,
            log_bodies,
        }
    }

    /// The signing region.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Where requests go.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Send `input` as `operation` and decode the response body as `O`.
    pub async fn call<I, O>(&self, operation: DynoOperation, input: &I) -> Result<O>
    where
        I: Serialize,
        O: DeserializeOwned,
    {
        let body = Bytes::from(serde_json::to_vec(input)?);
        let request_id = uuid::Uuid::new_v4();
        let context = SigningContext::new(
            Arc::clone(&self.credentials),
            self.region.as_str(),
            SERVICE,
            Utc::now(),
        );
        let request = build_request(operation, body, &self.endpoint, &context)?;

        debug!(
            %request_id,
            operation = %operation,
            uri = %request.uri(),
            headers = %redacted_headers(request.headers()),
            "sending request"
        );
        if self.log_bodies {
            debug!(%request_id, body = %String::from_utf8_lossy(request.body()), "request body");
        }

        let response = self.transport.send(request).await?;
        let status = response.status().as_u16();
        let body = response.into_body();

        if self.log_bodies {
            debug!(%request_id, status, body = %String::from_utf8_lossy(&body), "response body");
        }

        if !(200..=299).contains(&status) {
            let err = error_from_response(status, &body);
            warn!(%request_id, operation = %operation, status, error = %err, "request failed");
            return Err(err);
        }

        debug!(%request_id, operation = %operation, status, bytes = body.len(), "request succeeded");
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Map a non-2xx response to an error, preferring the service's own error
/// document when the body is one.
fn error_from_response(status: u16, body: &[u8]) -> DynoError {
    match ServiceErrorBody::parse(body) {
        Some(error) => DynoError::Service {
            code: error.code(),
            message: error.message,
        },
        None => DynoError::InvalidResponse {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        },
    }
}
