//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use ssr_gateway::config::{GatewayConfig, Mode};
use ssr_gateway::{Gateway, Shutdown};

pub const INDEX_HTML: &str = "<!doctype html><html lang=\"en\"><head><meta charset=\"UTF-8\">\
    <title>Site</title></head><body><div id=\"root\"></div></body></html>";

pub const EN_JSON: &str = r#"{"hero_title":"Welcome","nav":{"home":"Home"}}"#;
pub const PT_JSON: &str = r#"{"hero_title":"Bem-vindo","nav":{"home":"Início"}}"#;

/// Paths requested from a mock origin, in arrival order.
pub type RequestLog = Arc<Mutex<Vec<String>>>;

/// Start a programmable mock origin on an ephemeral port.
///
/// `f` receives the request path and returns a status code and body.
pub async fn start_programmable_origin<F, Fut>(f: F) -> (SocketAddr, RequestLog)
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let requests = log.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let requests = requests.clone();
                    tokio::spawn(async move {
                        let Some(path) = read_request_path(&mut socket).await else {
                            return;
                        };
                        requests.lock().unwrap().push(path.clone());

                        let (status, body) = f(path).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\
                             Connection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, log)
}

async fn read_request_path(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.ok()?;
        if n == 0 {
            return None;
        }
        head.extend_from_slice(&buf[..n]);
    }
    let head = String::from_utf8_lossy(&head);
    let request_line = head.lines().next()?;
    request_line.split_whitespace().nth(1).map(str::to_string)
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Write `en.json` and `pt.json` into a fresh directory.
pub fn locales_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("en.json"), EN_JSON).unwrap();
    std::fs::write(dir.path().join("pt.json"), PT_JSON).unwrap();
    dir
}

/// A built frontend with an index and one asset.
pub fn dist_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
    std::fs::create_dir(dir.path().join("assets")).unwrap();
    std::fs::write(dir.path().join("assets/app.js"), "console.log(1);").unwrap();
    dir
}

pub fn prod_config(locales: &Path, dist: &Path) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.mode = Mode::Prod;
    config.translations.locales_dir = locales.to_path_buf();
    config.frontend.dist_dir = dist.to_path_buf();
    config
}

pub fn dev_config(locales: &Path, origin: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.mode = Mode::Dev;
    config.translations.locales_dir = locales.to_path_buf();
    config.frontend.dev_origin = format!("http://{origin}");
    config.timeouts.upstream_secs = 2;
    config
}

/// Start a gateway and return its address with the handle that stops it.
pub async fn spawn_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let gateway = Gateway::start(config).await.unwrap();
    let addr = gateway.local_addr().unwrap();
    let shutdown = Shutdown::new();

    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = gateway.run(server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

/// A client that neither follows redirects nor uses a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
