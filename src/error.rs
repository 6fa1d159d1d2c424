//! Error types
//!
//! Request errors are recovered inside the handler and turned into a
//! plain-text response. Startup errors are fatal and end the process.

use std::net::SocketAddr;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW};
use hyper::{Response, StatusCode};
use thiserror::Error;

use crate::http;

/// Failure of a single request, answered with a status code and a short message
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid request method")]
    MethodNotAllowed,
    #[error("Invalid JSON")]
    MalformedBody(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("Payload Too Large")]
    PayloadTooLarge,
    #[error("JSON nesting too deep")]
    NestingTooDeep,
}

impl RequestError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NestingTooDeep => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Plain-text response for this error. Parse details stay in the logs.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = http::build_text_response(self.status(), &self.to_string());
        if matches!(self, Self::MethodNotAllowed) {
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static("POST"));
        }
        response
    }
}

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedBody(Box::new(err))
    }
}

/// Fatal error during startup
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid listen address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("failed to bind {addr}: {source}")]
    BindFailure {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}
