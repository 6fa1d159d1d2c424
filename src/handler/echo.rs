//! JSON echo endpoint
//!
//! Parses the request body into a generic JSON value and writes it back.
//! Output is structurally equal to the input; whitespace is not preserved,
//! object key order and number spelling are.
//!
//! Nesting is capped by `http.max_json_depth`. Deep documents are parsed,
//! serialized and dropped on a dedicated stack sized to their depth, so no
//! accepted depth overflows the worker thread.

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_LENGTH;
use hyper::{HeaderMap, Method, Request, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::config::HttpConfig;
use crate::error::RequestError;
use crate::http;
use crate::logger;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Documents up to this depth are handled on the caller's stack
const SHALLOW_DEPTH: usize = 128;
/// Stack budget per nesting level for deep documents
const STACK_PER_LEVEL: usize = 8 * 1024;
const MIN_DEEP_STACK: usize = 1024 * 1024;

/// Handle a request routed to the echo endpoint
pub async fn handle_echo<B>(
    req: Request<B>,
    limits: &HttpConfig,
) -> Result<Response<Full<Bytes>>, RequestError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    if req.method() != Method::POST {
        return Err(RequestError::MethodNotAllowed);
    }

    check_body_size(req.headers(), limits.max_body_size)?;

    let body = read_body(req.into_body(), limits.max_body_size).await?;

    let depth = nesting_depth(&body);
    if depth > limits.max_json_depth {
        return Err(RequestError::NestingTooDeep);
    }

    let json = echo_json(&body, depth)?;
    Ok(http::build_json_bytes_response(json))
}

/// Deepest `[`/`{` nesting in the body, ignoring brackets inside strings
fn nesting_depth(body: &[u8]) -> usize {
    let mut depth = 0usize;
    let mut max_depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for &b in body {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max_depth
}

/// Re-serialize the body compactly, on a dedicated stack when it nests deeply
fn echo_json(body: &[u8], depth: usize) -> Result<Vec<u8>, serde_json::Error> {
    if depth <= SHALLOW_DEPTH {
        return reserialize(body);
    }
    let stack_size = depth.saturating_mul(STACK_PER_LEVEL).max(MIN_DEEP_STACK);
    stacker::grow(stack_size, || reserialize(body))
}

/// The parsed value never leaves this function, so it is dropped on the same stack
fn reserialize(body: &[u8]) -> Result<Vec<u8>, serde_json::Error> {
    let value = parse_json(body)?;
    serde_json::to_vec(&value)
}

/// Parse exactly one JSON document with no recursion limit
fn parse_json(body: &[u8]) -> Result<Value, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_slice(body);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

/// Reject early when the declared Content-Length is already over the limit
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Result<(), RequestError> {
    let Some(content_length) = headers.get(CONTENT_LENGTH) else {
        return Ok(());
    };
    let Ok(size_str) = content_length.to_str() else {
        logger::log_warning("Content-Length header contains non-ASCII characters");
        return Ok(());
    };
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => Err(RequestError::PayloadTooLarge),
        Ok(_) => Ok(()),
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            Ok(())
        }
    }
}

/// Collect the body, enforcing the limit on the bytes actually received
async fn read_body<B>(body: B, max_body_size: u64) -> Result<Bytes, RequestError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(RequestError::PayloadTooLarge),
        Err(e) => Err(RequestError::MalformedBody(e)),
    }
}
