//! Shared utilities for integration testing.
//!
//! Mock upstreams are raw TCP servers so the tests can observe exactly
//! what the proxy put on the wire (credential substitution, header
//! filtering) and control response framing (sized JSON vs. live SSE).

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use keygate::config::ProxyConfig;
use keygate::lifecycle::Shutdown;
use keygate::{upstream, HttpServer};

/// Upstream credential the proxy must substitute in.
pub const UPSTREAM_KEY: &str = "sk-upstream-secret";
/// Proxy credential expected in `x-api-key`.
pub const PROXY_KEY: &str = "proxy-test-key";

/// Canned behavior for the mock upstream.
#[derive(Clone, Copy)]
pub enum MockResponse {
    /// Sized JSON response with `Content-Length`.
    Json { status: u16, body: &'static str },
    /// SSE response written chunk by chunk with flushes in between.
    Sse { chunks: &'static [&'static str] },
    /// SSE response that keeps writing until the peer goes away.
    SseEndless,
}

pub struct MockUpstream {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    disconnects: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of requests that reached the upstream.
    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Number of mid-stream peer disconnects observed (SseEndless mode).
    pub fn disconnect_count(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }

    /// Raw head (request line + headers) of the most recent request.
    pub fn last_request_head(&self) -> String {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("mock upstream received no request")
    }
}

/// Start a mock upstream on an ephemeral port.
pub async fn start_mock_upstream(response: MockResponse) -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let hits = Arc::new(AtomicUsize::new(0));
    let disconnects = Arc::new(AtomicUsize::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));

    let mock = MockUpstream {
        addr,
        hits: hits.clone(),
        disconnects: disconnects.clone(),
        requests: requests.clone(),
    };

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let hits = hits.clone();
                    let disconnects = disconnects.clone();
                    let requests = requests.clone();
                    tokio::spawn(async move {
                        handle_connection(socket, response, hits, disconnects, requests).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    mock
}

async fn handle_connection(
    mut socket: TcpStream,
    response: MockResponse,
    hits: Arc<AtomicUsize>,
    disconnects: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
) {
    let head = match read_request(&mut socket).await {
        Some(head) => head,
        None => return,
    };
    requests.lock().unwrap().push(head);
    hits.fetch_add(1, Ordering::SeqCst);

    match response {
        MockResponse::Json { status, body } => {
            let response_str = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line(status),
                body.len(),
                body
            );
            let _ = socket.write_all(response_str.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
        MockResponse::Sse { chunks } => {
            let head = "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nConnection: close\r\n\r\n";
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.flush().await;
            for chunk in chunks {
                tokio::time::sleep(Duration::from_millis(40)).await;
                let _ = socket.write_all(chunk.as_bytes()).await;
                let _ = socket.flush().await;
            }
            let _ = socket.shutdown().await;
        }
        MockResponse::SseEndless => {
            let head = "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nConnection: close\r\n\r\n";
            if socket.write_all(head.as_bytes()).await.is_err() {
                disconnects.fetch_add(1, Ordering::SeqCst);
                return;
            }
            let _ = socket.flush().await;
            loop {
                tokio::time::sleep(Duration::from_millis(20)).await;
                if socket.write_all(b"data: tick\n\n").await.is_err()
                    || socket.flush().await.is_err()
                {
                    disconnects.fetch_add(1, Ordering::SeqCst);
                    break;
                }
            }
        }
    }
}

/// Read the request head (through the blank line) and drain any sized
/// body. Returns the raw head.
async fn read_request(socket: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let head_end = loop {
        let mut chunk = [0u8; 1024];
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_head_end(&buf) {
            break pos;
        }
        if buf.len() > 64 * 1024 {
            return None;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();

    // Drain a Content-Length body so the client never blocks on writes.
    if let Some(content_length) = parse_content_length(&head) {
        let already = buf.len() - (head_end + 4);
        let mut remaining = content_length.saturating_sub(already);
        let mut sink = [0u8; 4096];
        while remaining > 0 {
            let n = socket.read(&mut sink).await.ok()?;
            if n == 0 {
                break;
            }
            remaining = remaining.saturating_sub(n);
        }
    }

    Some(head)
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn parse_content_length(head: &str) -> Option<usize> {
    head.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name.trim().eq_ignore_ascii_case("content-length") {
            value.trim().parse().ok()
        } else {
            None
        }
    })
}

fn status_line(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        400 => "400 Bad Request",
        404 => "404 Not Found",
        429 => "429 Too Many Requests",
        500 => "500 Internal Server Error",
        _ => "200 OK",
    }
}

/// Start the proxy on an ephemeral port, pointed at `upstream_base`.
///
/// The returned `Shutdown` must stay alive for the duration of the test;
/// dropping it stops the server.
pub async fn start_proxy(upstream_base: &str) -> (SocketAddr, Shutdown) {
    let config = Arc::new(ProxyConfig::new(UPSTREAM_KEY, PROXY_KEY, upstream_base).unwrap());
    let client = upstream::build();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = HttpServer::new(config, client);
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}

/// Test HTTP client that ignores any ambient proxy configuration.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
