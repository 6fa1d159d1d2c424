//! Routing module
//!
//! Maps request paths to endpoints by exact match. The table is built once
//! at startup and only read afterwards.

mod table;

pub use table::{Route, RouteTable};
