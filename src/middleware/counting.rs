use std::sync::Arc;

use tracing::info;

use crate::chain::Chain;
use crate::context::Context;
use crate::metrics::RequestMetrics;
use crate::middleware::Middleware;

/// Counts every request that reaches it before calling the next handler.
///
/// The counter lives in the injected [`RequestMetrics`]; several `Counting`
/// instances built from the same `Arc` share one total.
#[derive(Clone, Debug)]
pub struct Counting {
    metrics: Arc<RequestMetrics>,
}

impl Counting {
    pub fn new(metrics: Arc<RequestMetrics>) -> Self {
        Self { metrics }
    }
}

impl Middleware for Counting {
    fn wrap(&self, next: Chain) -> Chain {
        let metrics = Arc::clone(&self.metrics);
        Chain::new(move |cx: Context| {
            let next = next.clone();
            let metrics = Arc::clone(&metrics);
            async move {
                let count = metrics.increment();
                info!(count, "request count (incl. current)");
                next.call(cx).await
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use http::{Method, Uri};

    use super::*;
    use crate::chain::compose;
    use crate::request::Request;

    #[tokio::test]
    async fn counts_each_call() {
        let metrics = Arc::new(RequestMetrics::new());
        let chain = compose(
            |cx: Context| async move { cx },
            &[&Counting::new(Arc::clone(&metrics))],
        );

        for _ in 0..3 {
            chain.call(Context::new(Request::new(Method::GET, Uri::from_static("/")))).await;
        }

        assert_eq!(metrics.requests(), 3);
    }
}
