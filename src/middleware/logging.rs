use tracing::info;

use crate::chain::Chain;
use crate::context::Context;
use crate::middleware::Middleware;

/// Logs the request method and target, then hands over to the next handler.
#[derive(Clone, Copy, Debug, Default)]
pub struct Logging;

impl Middleware for Logging {
    fn wrap(&self, next: Chain) -> Chain {
        Chain::new(move |cx: Context| {
            let next = next.clone();
            async move {
                info!(
                    method = %cx.request().method(),
                    uri = cx.request().target(),
                    "request received"
                );
                next.call(cx).await
            }
        })
    }
}
