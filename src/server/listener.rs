// Listener module
// Creates the single TCP listener the service owns for its whole lifetime

use std::net::SocketAddr;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

use crate::error::StartupError;

/// Pending connections the kernel queues before `accept`
const LISTEN_BACKLOG: i32 = 128;

/// Create a non-blocking `TcpListener` bound to `addr`.
///
/// `SO_REUSEADDR` is set so a restarted process can rebind a port still in
/// `TIME_WAIT`. `SO_REUSEPORT` is not: a port held by another live process
/// must fail with `BindFailure`.
///
/// Must be called from within a tokio runtime.
pub fn create_listener(addr: SocketAddr) -> Result<TcpListener, StartupError> {
    bind_socket(addr).map_err(|source| StartupError::BindFailure { addr, source })
}

fn bind_socket(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;

    // socket2::Socket -> std::net::TcpListener -> tokio::net::TcpListener
    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
