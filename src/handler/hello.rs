//! Greeting endpoint

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use serde::Serialize;

use crate::config::ServiceConfig;
use crate::error::RequestError;
use crate::http;

/// Greeting body, built fresh for every request
#[derive(Debug, Serialize)]
pub struct Greeting {
    pub message: String,
}

impl Greeting {
    pub fn for_service(name: &str) -> Self {
        Self {
            message: format!("Hello from {name}!"),
        }
    }
}

/// Answer any method with the greeting. The request body is never read.
pub fn handle_hello(service: &ServiceConfig) -> Result<Response<Full<Bytes>>, RequestError> {
    http::build_json_response(&Greeting::for_service(&service.name))
}
