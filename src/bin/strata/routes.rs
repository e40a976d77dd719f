use std::sync::Arc;
use std::time::Duration;

use strata::middleware::{Counting, Logging, Timing};
use strata::{Context, RequestMetrics, Router, StatusCode, compose};

/// Simulated work done by `/users`.
const USERS_LATENCY: Duration = Duration::from_secs(2);

/// Both routes share one counter; only the middleware order differs.
///
/// The root chain also answers every path no other route claims.
pub fn app(metrics: &Arc<RequestMetrics>) -> Router {
    let counting = Counting::new(Arc::clone(metrics));
    let timing = Timing::recording(Arc::clone(metrics));
    let root_chain = compose(root, &[&Logging, &counting, &timing]);

    Router::new()
        .any("/", root_chain.clone())
        .any("/{*rest}", root_chain)
        .route("/users", users, &[&counting, &Logging, &timing])
}

// GET / → 200 "Hello Root"
async fn root(mut cx: Context) -> Context {
    cx.respond("Hello Root");
    cx
}

// GET /users → 202 "Hello Users", after a deliberate delay
async fn users(mut cx: Context) -> Context {
    tokio::time::sleep(USERS_LATENCY).await;
    cx.respond((StatusCode::ACCEPTED, "Hello Users"));
    cx
}

#[cfg(test)]
mod tests {
    use strata::{Method, Request, Server, ServerConfig, Uri};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::oneshot;

    use super::*;

    fn context(path: &'static str) -> Context {
        Context::new(Request::new(Method::GET, Uri::from_static(path)))
    }

    #[tokio::test]
    async fn root_says_hello() {
        let res = root(context("/")).await.into_response();
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body(), b"Hello Root");
    }

    #[tokio::test(start_paused = true)]
    async fn users_is_accepted_after_delay() {
        let started = tokio::time::Instant::now();
        let res = users(context("/users")).await.into_response();

        assert_eq!(res.status_code(), StatusCode::ACCEPTED);
        assert_eq!(res.body(), b"Hello Users");
        assert!(started.elapsed() >= USERS_LATENCY);
    }

    #[tokio::test]
    async fn unclaimed_paths_fall_through_to_root() {
        let metrics = Arc::new(RequestMetrics::new());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let server = tokio::spawn(
            Server::with_config(ServerConfig::default()).serve_on(listener, app(&metrics), async move {
                let _ = stopped.await;
            }),
        );

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /favicon.ico HTTP/1.1\r\nhost: test\r\nconnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.unwrap();

        assert!(raw.starts_with("HTTP/1.1 200"), "{raw}");
        assert!(raw.ends_with("Hello Root"), "{raw}");
        assert_eq!(metrics.requests(), 1);
        assert_eq!(metrics.timed(), 1);

        let _ = stop.send(());
        server.await.unwrap().unwrap();
    }
}
