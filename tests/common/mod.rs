//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use recipe_unit_converter::config::ConverterConfig;
use recipe_unit_converter::http::HttpServer;
use recipe_unit_converter::lifecycle::Shutdown;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Request targets (path + query) seen by a mock conversion service.
pub type SeenRequests = Arc<Mutex<Vec<String>>>;

/// Start a programmable mock of the external conversion service.
///
/// `f` receives the request target (e.g. `/convert/?from=cup&to=&value=2`)
/// and returns the status code and JSON body to answer with.
pub async fn start_mock_converter<F, Fut>(f: F) -> (SocketAddr, SeenRequests)
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen: SeenRequests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let seen_by_task = seen.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let seen = seen_by_task.clone();
                    tokio::spawn(async move {
                        let target = match read_request_target(&mut socket).await {
                            Some(t) => t,
                            None => return,
                        };
                        seen.lock().unwrap().push(target.clone());

                        let (status, body) = f(target).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, seen)
}

/// Mock that always answers with the same status and body.
#[allow(dead_code)]
pub async fn start_fixed_converter(status: u16, body: &'static str) -> (SocketAddr, SeenRequests) {
    start_mock_converter(move |_| async move { (status, body.to_string()) }).await
}

// Read the request head and return the target from the request line.
async fn read_request_target(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let head = String::from_utf8_lossy(&buf);
    head.lines()
        .next()?
        .split_whitespace()
        .nth(1)
        .map(str::to_string)
}

/// Converter configuration pointing at a mock conversion service.
pub fn config_for(upstream: SocketAddr) -> ConverterConfig {
    let mut config = ConverterConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = format!("http://{}/convert/", upstream);
    config.upstream.timeout_secs = 5;
    config.upstream.use_system_proxy = false;
    config
}

/// Start the converter on an ephemeral port.
pub async fn start_converter(config: ConverterConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client that never reuses connections between tests.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
