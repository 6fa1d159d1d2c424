//! HTTP protocol layer module
//!
//! Response builders shared by the endpoint handlers.

pub mod response;

// Re-export commonly used types
pub use response::{
    build_404_response, build_json_bytes_response, build_json_response, build_text_response,
};
