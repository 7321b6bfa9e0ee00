// Listener module
// Creates the dual-stack TCP listener the server accepts on

use std::net::{Ipv6Addr, SocketAddr};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Create a dual-stack `TcpListener` accepting IPv4 and IPv6 on `port`.
///
/// A single IPv6 socket with `IPV6_V6ONLY` disabled covers both address
/// families; IPv4 peers appear as v4-mapped addresses.
pub fn create_dual_stack_listener(port: u16) -> std::io::Result<TcpListener> {
    let addr = SocketAddr::from((Ipv6Addr::UNSPECIFIED, port));

    let socket = Socket::new(Domain::IPV6, Type::STREAM, Some(Protocol::TCP))?;

    // Accept IPv4 alongside IPv6 on the same socket
    socket.set_only_v6(false)?;

    // Allow binding to a port still in TIME_WAIT after a restart
    socket.set_reuse_address(true)?;

    // Set non-blocking mode for async compatibility
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(128)?;

    // Convert socket2::Socket to std::net::TcpListener, then to tokio's
    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn binds_an_ipv6_any_socket() {
        let listener = create_dual_stack_listener(0).unwrap();
        let addr = listener.local_addr().unwrap();
        assert!(addr.is_ipv6());
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn accepts_ipv4_mapped_connections() {
        let listener = create_dual_stack_listener(0).unwrap();
        let port = listener.local_addr().unwrap().port();

        let connect = tokio::net::TcpStream::connect(("127.0.0.1", port));
        let (accepted, connected) = tokio::join!(listener.accept(), connect);
        assert!(accepted.is_ok());
        assert!(connected.is_ok());
    }
}
