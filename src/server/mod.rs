// Server module entry
// Listener setup, connection handling and the accept loop

pub mod connection;
pub mod listener;

// `loop` is a keyword, so the module is named server_loop
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use server_loop::start_server_loop;
