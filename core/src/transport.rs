//! Executing `HttpRequest` values against the network.
//!
//! # Design
//! The `Transport` trait is the only I/O seam in the crate. A transport
//! returns every response it receives as data, whatever the status; only
//! failures where no response arrived are errors. Status interpretation is
//! left to `TodoClient`.

use std::time::Duration;

use thiserror::Error;
use tracing::trace;
use ureq::Agent;

use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Failures where no HTTP response was received.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The host could not be resolved or refused the connection.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other I/O or protocol failure.
    #[error("transport failure: {0}")]
    Io(String),
}

/// Executes a request and returns the raw response.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport backed by a `ureq` agent.
///
/// The agent is configured with a global timeout, with status-code errors
/// disabled, and with redirects not followed, so 3xx/4xx/5xx responses all
/// come back as `HttpResponse` values.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .max_redirects_will_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.full_url();
        trace!(method = %request.method, %url, "sending request");

        let body = request.body.as_deref().unwrap_or("");
        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch => {
                let mut builder = match request.method {
                    HttpMethod::Post => self.agent.post(&url),
                    HttpMethod::Put => self.agent.put(&url),
                    _ => self.agent.patch(&url),
                };
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.send(body.as_bytes())
            }
        };

        let mut response = result.map_err(classify)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_string().map_err(classify)?;

        trace!(status, %url, "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn classify(error: ureq::Error) -> TransportError {
    let message = error.to_string();
    match error {
        ureq::Error::Timeout(_) => TransportError::Timeout(message),
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
            TransportError::Connect(message)
        }
        ureq::Error::Io(io) => match io.kind() {
            std::io::ErrorKind::ConnectionRefused => TransportError::Connect(message),
            std::io::ErrorKind::TimedOut => TransportError::Timeout(message),
            _ => TransportError::Io(message),
        },
        _ => TransportError::Io(message),
    }
}
