use std::sync::Arc;

use strata::middleware::{Counting, Logging, Timing};
use strata::{Context, Method, Request, RequestMetrics, Uri, compose};

const REQUESTS: u64 = 2_000;

async fn root(mut cx: Context) -> Context {
    tokio::task::yield_now().await;
    cx.respond("Hello Root");
    cx
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn counter_loses_no_updates() {
    let metrics = Arc::new(RequestMetrics::new());
    let counting = Counting::new(Arc::clone(&metrics));
    let chain = compose(root, &[&Logging, &counting, &Timing::recording(Arc::clone(&metrics))]);

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..REQUESTS {
        let chain = chain.clone();
        tasks.spawn(async move {
            chain.call(Context::new(Request::new(Method::GET, Uri::from_static("/")))).await
        });
    }
    while let Some(done) = tasks.join_next().await {
        assert_eq!(done.unwrap().response().body(), b"Hello Root");
    }

    assert_eq!(metrics.requests(), REQUESTS);
    assert_eq!(metrics.timed(), REQUESTS);
}

#[test]
fn counter_is_exact_across_os_threads() {
    let metrics = Arc::new(RequestMetrics::new());
    let chain = compose(root, &[&Counting::new(Arc::clone(&metrics))]);

    let threads: Vec<_> = (0..8)
        .map(|_| {
            let chain = chain.clone();
            std::thread::spawn(move || {
                let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
                rt.block_on(async {
                    for _ in 0..REQUESTS / 8 {
                        chain.call(Context::new(Request::new(Method::GET, Uri::from_static("/")))).await;
                    }
                });
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }

    assert_eq!(metrics.requests(), REQUESTS);
}
