// Application state module
// Read-only state shared by every connection task

use super::types::Config;
use crate::routing::RouteTable;

/// Application state
///
/// Built once before the listener starts accepting and never mutated
/// afterwards, so it is shared through an `Arc` without locks.
pub struct AppState {
    pub config: Config,
    pub routes: RouteTable,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            routes: RouteTable::new(),
        }
    }
}
