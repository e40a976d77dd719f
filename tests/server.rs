use std::sync::Arc;
use std::time::Duration;

use strata::middleware::{Counting, Logging, Timing};
use strata::{Context, RequestMetrics, Router, Server, ServerConfig, StatusCode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct Running {
    addr: std::net::SocketAddr,
    stop: oneshot::Sender<()>,
    server: JoinHandle<Result<(), strata::Error>>,
}

impl Running {
    async fn shutdown(self) {
        let _ = self.stop.send(());
        self.server.await.unwrap().unwrap();
    }
}

async fn start(router: Router, config: ServerConfig) -> Running {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        Server::with_config(config)
            .serve_on(listener, router, async move {
                let _ = stopped.await;
            })
            .await
    });
    Running { addr, stop, server }
}

/// Sends one HTTP/1.1 request and returns the raw response text.
async fn send(addr: std::net::SocketAddr, method: &str, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let head = format!("{method} {path} HTTP/1.1\r\nhost: test\r\nconnection: close\r\n\r\n");
    stream.write_all(head.as_bytes()).await.unwrap();
    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();
    raw
}

async fn root(mut cx: Context) -> Context {
    cx.respond("Hello Root");
    cx
}

async fn user(mut cx: Context) -> Context {
    let id = cx.request().param("id").unwrap_or("unknown").to_owned();
    cx.respond(format!("user {id}"));
    cx
}

async fn stuck(cx: Context) -> Context {
    tokio::time::sleep(Duration::from_secs(60)).await;
    cx
}

#[tokio::test]
async fn serves_a_composed_chain() {
    let metrics = Arc::new(RequestMetrics::new());
    let counting = Counting::new(Arc::clone(&metrics));
    let router = Router::new().route("/", root, &[&Logging, &counting, &Timing::new()]);
    let running = start(router, ServerConfig::default()).await;

    let first = send(running.addr, "GET", "/").await;
    let second = send(running.addr, "POST", "/").await;

    assert!(first.starts_with("HTTP/1.1 200"), "{first}");
    assert!(first.ends_with("Hello Root"), "{first}");
    assert!(second.starts_with("HTTP/1.1 200"), "{second}");
    assert_eq!(metrics.requests(), 2);

    running.shutdown().await;
}

#[tokio::test]
async fn unknown_routes_get_status_codes() {
    let router = Router::new()
        .get("/users/{id}", user)
        .post("/users", root);
    let running = start(router, ServerConfig::default()).await;

    let found = send(running.addr, "GET", "/users/42").await;
    let missing = send(running.addr, "GET", "/nope").await;
    let wrong_method = send(running.addr, "GET", "/users").await;

    assert!(found.ends_with("user 42"), "{found}");
    assert!(missing.starts_with("HTTP/1.1 404"), "{missing}");
    assert!(wrong_method.starts_with("HTTP/1.1 405"), "{wrong_method}");
    assert!(wrong_method.to_ascii_lowercase().contains("allow: post"), "{wrong_method}");

    running.shutdown().await;
}

#[tokio::test]
async fn slow_chain_is_cut_off() {
    let metrics = Arc::new(RequestMetrics::new());
    let router = Router::new().route("/slow", stuck, &[&Timing::recording(Arc::clone(&metrics))]);
    let config = ServerConfig::default().handler_timeout(Duration::from_millis(100));
    let running = start(router, config).await;

    let res = send(running.addr, "GET", "/slow").await;

    let unavailable = StatusCode::SERVICE_UNAVAILABLE.as_u16();
    assert!(res.starts_with(&format!("HTTP/1.1 {unavailable}")), "{res}");
    assert_eq!(metrics.timed(), 1);

    running.shutdown().await;
}
