//! Route table module
//!
//! Exact path to endpoint lookup.

use std::collections::HashMap;

/// Endpoints served by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Constant greeting, any method
    Hello,
    /// JSON echo, POST only
    Echo,
}

/// Immutable mapping from request path to route
#[derive(Debug)]
pub struct RouteTable {
    routes: HashMap<&'static str, Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        let routes = HashMap::from([("/hello", Route::Hello), ("/echo", Route::Echo)]);
        Self { routes }
    }

    /// Find the route for a path. The path must not include the query string.
    pub fn lookup(&self, path: &str) -> Option<Route> {
        self.routes.get(path).copied()
    }

    pub fn paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.routes.keys().copied()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_exact() {
        let table = RouteTable::new();
        assert_eq!(table.lookup("/hello"), Some(Route::Hello));
        assert_eq!(table.lookup("/echo"), Some(Route::Echo));
    }

    #[test]
    fn test_lookup_is_not_prefix_match() {
        let table = RouteTable::new();
        assert_eq!(table.lookup("/hello/"), None);
        assert_eq!(table.lookup("/echo/more"), None);
        assert_eq!(table.lookup("/hell"), None);
        assert_eq!(table.lookup("/"), None);
        assert_eq!(table.lookup("/unknown"), None);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let table = RouteTable::new();
        assert_eq!(table.lookup("/HELLO"), None);
    }

    #[test]
    fn test_paths() {
        let table = RouteTable::new();
        let mut paths: Vec<_> = table.paths().collect();
        paths.sort_unstable();
        assert_eq!(paths, vec!["/echo", "/hello"]);
    }
}
