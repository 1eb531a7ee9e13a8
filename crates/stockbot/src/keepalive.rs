//! Keep-alive HTTP listener
//!
//! Hosting platforms that idle processes without inbound traffic ping this
//! endpoint. `GET /` answers with a fixed status line; every other request
//! gets a 404. It has no link to the bot's command handling.

use crate::error::Result;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Body served on `GET /`
pub const STATUS_BODY: &str = "✅ Discord Bot is running!";

const NOT_FOUND_BODY: &str = "Not Found";

/// Largest request head read before answering
const MAX_REQUEST_HEAD: usize = 8 * 1024;

/// Time a client gets to send its request head
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Bind the listener on all interfaces
pub async fn bind(port: u16) -> Result<TcpListener> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "keep-alive server listening");
    Ok(listener)
}

/// Bind and serve in a background task
pub async fn spawn(port: u16) -> Result<JoinHandle<()>> {
    let listener = bind(port).await?;
    Ok(tokio::spawn(serve(listener)))
}

/// Accept connections until the task is aborted
pub async fn serve(listener: TcpListener) {
    serve_with_timeout(listener, REQUEST_TIMEOUT).await;
}

async fn serve_with_timeout(listener: TcpListener, request_timeout: Duration) {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                warn!(error = %err, "keep-alive accept failed");
                if let Some(delay) = accept_backoff(&err) {
                    tokio::time::sleep(delay).await;
                }
                continue;
            }
        };

        tokio::spawn(async move {
            if let Err(err) = handle(socket, request_timeout).await {
                debug!(%peer, error = %err, "keep-alive connection error");
            }
        });
    }
}

/// Pause before the next accept when the process is out of descriptors
fn accept_backoff(err: &io::Error) -> Option<Duration> {
    // EMFILE / ENFILE
    match err.raw_os_error() {
        Some(23 | 24) => Some(ACCEPT_BACKOFF),
        _ => None,
    }
}

async fn handle(mut socket: TcpStream, request_timeout: Duration) -> io::Result<()> {
    let head = tokio::time::timeout(request_timeout, read_head(&mut socket))
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "request head not received"))??;

    let head = String::from_utf8_lossy(&head);
    let request_line = head.lines().next().unwrap_or_default();
    let (status, body) = route(request_line);

    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    socket.write_all(response.as_bytes()).await?;
    socket.shutdown().await
}

async fn read_head(socket: &mut TcpStream) -> io::Result<Vec<u8>> {
    let mut head = Vec::with_capacity(512);
    let mut buf = [0u8; 512];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") && head.len() < MAX_REQUEST_HEAD {
        let n = socket.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    Ok(head)
}

/// Status line and body for a request line
fn route(request_line: &str) -> (&'static str, &'static str) {
    let mut parts = request_line.split_whitespace();
    let method = parts.next();
    let path = parts
        .next()
        .map(|target| target.split('?').next().unwrap_or(target));

    match (method, path) {
        (Some("GET"), Some("/")) => ("200 OK", STATUS_BODY),
        _ => ("404 Not Found", NOT_FOUND_BODY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn request(addr: SocketAddr, raw: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(raw.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    async fn start() -> (SocketAddr, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        (addr, tokio::spawn(serve(listener)))
    }

    #[test]
    fn test_route() {
        assert_eq!(route("GET / HTTP/1.1"), ("200 OK", STATUS_BODY));
        assert_eq!(route("GET /?ping=1 HTTP/1.1"), ("200 OK", STATUS_BODY));
        assert_eq!(route("GET /health HTTP/1.1").0, "404 Not Found");
        assert_eq!(route("POST / HTTP/1.1").0, "404 Not Found");
        assert_eq!(route("").0, "404 Not Found");
    }

    #[tokio::test]
    async fn test_root_reports_running() {
        let (addr, server) = start().await;

        let response = request(addr, "GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.ends_with("\r\n\r\n✅ Discord Bot is running!"));
        assert!(response.contains(&format!("Content-Length: {}", STATUS_BODY.len())));

        server.abort();
    }

    #[tokio::test]
    async fn test_other_paths_are_not_found() {
        let (addr, server) = start().await;

        let response = request(addr, "GET /metrics HTTP/1.1\r\n\r\n").await;
        assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));

        server.abort();
    }

    #[tokio::test]
    async fn test_serves_many_connections() {
        let (addr, server) = start().await;

        for _ in 0..3 {
            let response = request(addr, "GET / HTTP/1.1\r\n\r\n").await;
            assert!(response.contains(STATUS_BODY));
        }

        server.abort();
    }

    #[test]
    fn test_accept_backoff_only_on_descriptor_exhaustion() {
        assert_eq!(accept_backoff(&io::Error::from_raw_os_error(24)), Some(ACCEPT_BACKOFF));
        assert_eq!(accept_backoff(&io::Error::from_raw_os_error(23)), Some(ACCEPT_BACKOFF));
        assert_eq!(
            accept_backoff(&io::Error::from(io::ErrorKind::ConnectionAborted)),
            None
        );
    }

    #[tokio::test]
    async fn test_idle_clients_do_not_block_status() {
        let (addr, server) = start().await;

        let mut idle = Vec::new();
        for _ in 0..32 {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(b"GET / HTTP/1.1\r\n").await.unwrap();
            idle.push(stream);
        }

        let response = request(addr, "GET / HTTP/1.1\r\n\r\n").await;
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));

        drop(idle);
        let response = request(addr, "GET / HTTP/1.1\r\n\r\n").await;
        assert!(response.contains(STATUS_BODY));
        assert!(!server.is_finished());

        server.abort();
    }

    #[tokio::test]
    async fn test_idle_client_is_disconnected_after_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve_with_timeout(listener, Duration::from_millis(100)));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"GET / HTTP/1.1\r\n").await.unwrap();

        let mut response = Vec::new();
        let closed =
            tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut response)).await;
        assert!(closed.is_ok(), "idle connection left open");
        assert!(response.is_empty());

        let response = request(addr, "GET / HTTP/1.1\r\n\r\n").await;
        assert!(response.contains(STATUS_BODY));

        server.abort();
    }
}
