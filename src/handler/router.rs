//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: route lookup, dispatch, access logging.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, SERVER};
use hyper::{Request, Response};

use super::{echo, hello};
use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::Route;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let access_entry = state
        .config
        .logging
        .access_log
        .then(|| AccessLogEntry::from_request(&req, peer_addr));

    let mut response = route_request(req, &state).await;

    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server_name);
    }

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Dispatch by exact path; request errors become plain-text responses here
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    let result = match state.routes.lookup(&path) {
        Some(Route::Hello) => hello::handle_hello(&state.config.service),
        Some(Route::Echo) => echo::handle_echo(req, &state.config.http).await,
        None => {
            logger::log_unmatched_path(&path);
            return http::build_404_response();
        }
    };

    result.unwrap_or_else(|err| {
        logger::log_request_error(&method, &path, &err);
        err.into_response()
    })
}
