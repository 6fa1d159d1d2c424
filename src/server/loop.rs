// Server loop module
// Accepts connections for the lifetime of the process

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept connections forever, spawning one task per connection.
///
/// Accept errors (e.g. running out of file descriptors) are logged and the
/// loop keeps going; there is no shutdown path.
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>) {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                accept_connection(stream, peer_addr, &state, &active_connections);
            }
            Err(e) => logger::log_accept_error(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::create_listener;
    use http_body_util::{BodyExt, Empty, Full};
    use hyper::body::Bytes;
    use hyper::{Method, Request, StatusCode};
    use hyper_util::rt::TokioIo;
    use std::net::SocketAddr;
    use tokio::net::TcpStream;

    async fn spawn_server(max_connections: Option<u64>) -> SocketAddr {
        let mut config = Config::load_from("does-not-exist/echo-config").unwrap();
        config.performance.max_connections = max_connections;
        spawn_with(config)
    }

    fn spawn_with(config: Config) -> SocketAddr {
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(start_server_loop(listener, Arc::new(AppState::new(config))));
        addr
    }

    async fn request(
        addr: SocketAddr,
        method: Method,
        path: &str,
        body: &'static str,
    ) -> (StatusCode, String) {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .unwrap();
        tokio::spawn(conn);

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("host", addr.to_string())
            .body(Full::new(Bytes::from(body)))
            .unwrap();
        let resp = sender.send_request(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_end_to_end_scenarios() {
        let addr = spawn_server(None).await;

        let (status, body) =
            request(addr, Method::POST, "/echo", r#"{"a":1,"b":[true,null]}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"a":1,"b":[true,null]}"#);

        let (status, body) = request(addr, Method::GET, "/echo", "").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, "Invalid request method");

        let (status, body) = request(addr, Method::POST, "/echo", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Invalid JSON");

        let (status, body) = request(addr, Method::GET, "/hello", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"message":"Hello from Rust server!"}"#);

        let (status, _) = request(addr, Method::DELETE, "/unknown", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_connections_over_limit_are_dropped() {
        let addr = spawn_server(Some(0)).await;
        let stream = TcpStream::connect(addr).await.unwrap();
        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .unwrap();
        tokio::spawn(conn);

        let req = Request::builder()
            .uri("/hello")
            .header("host", addr.to_string())
            .body(Empty::<Bytes>::new())
            .unwrap();
        assert!(sender.send_request(req).await.is_err());
    }

    #[tokio::test]
    async fn test_keep_alive_serves_multiple_requests() {
        let addr = spawn_server(None).await;
        let stream = TcpStream::connect(addr).await.unwrap();
        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .unwrap();
        tokio::spawn(conn);

        for n in 0..3 {
            let req = Request::builder()
                .method(Method::POST)
                .uri("/echo")
                .header("host", addr.to_string())
                .body(Full::new(Bytes::from(format!("[{n}]"))))
                .unwrap();
            sender.ready().await.unwrap();
            let resp = sender.send_request(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            let bytes = resp.into_body().collect().await.unwrap().to_bytes();
            assert_eq!(bytes, Bytes::from(format!("[{n}]")));
        }
    }

    #[tokio::test]
    async fn test_zero_keep_alive_closes_after_one_response() {
        let mut config = Config::load_from("does-not-exist/echo-config").unwrap();
        config.performance.keep_alive_timeout = 0;
        let addr = spawn_with(config);

        let stream = TcpStream::connect(addr).await.unwrap();
        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .unwrap();
        tokio::spawn(conn);

        let hello = || {
            Request::builder()
                .uri("/hello")
                .header("host", addr.to_string())
                .body(Full::new(Bytes::new()))
                .unwrap()
        };

        let resp = sender.send_request(hello()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        resp.into_body().collect().await.unwrap();

        let reused = match sender.ready().await {
            Ok(()) => sender.send_request(hello()).await.is_ok(),
            Err(_) => false,
        };
        assert!(!reused, "connection was kept open");
    }
}
