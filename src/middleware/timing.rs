use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::chain::Chain;
use crate::context::Context;
use crate::metrics::RequestMetrics;
use crate::middleware::Middleware;

/// Measures one call of the next handler.
///
/// The measurement is taken when a scoped guard drops, so it is reported
/// whether the downstream chain returns, panics, or is cancelled by the
/// transport's deadline.
#[derive(Clone, Debug, Default)]
pub struct Timing {
    metrics: Option<Arc<RequestMetrics>>,
}

impl Timing {
    /// Logs elapsed time only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs elapsed time and records it into `metrics`.
    pub fn recording(metrics: Arc<RequestMetrics>) -> Self {
        Self { metrics: Some(metrics) }
    }
}

impl Middleware for Timing {
    fn wrap(&self, next: Chain) -> Chain {
        let metrics = self.metrics.clone();
        Chain::new(move |cx: Context| {
            let next = next.clone();
            let metrics = metrics.clone();
            async move {
                let _stopwatch = Stopwatch {
                    start: Instant::now(),
                    uri: cx.request().target().to_owned(),
                    metrics,
                };
                next.call(cx).await
            }
        })
    }
}

struct Stopwatch {
    start: Instant,
    uri: String,
    metrics: Option<Arc<RequestMetrics>>,
}

impl Drop for Stopwatch {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        if let Some(metrics) = &self.metrics {
            metrics.record_elapsed(elapsed);
        }
        info!(uri = %self.uri, ?elapsed, "request time");
    }
}
