//! Middleware layer.
//!
//! Middleware wraps the next handler in a chain with cross-cutting behavior:
//! structured logging, request counting, latency measurement. It receives the
//! next [`Chain`] once, at composition time, and returns the chain that
//! replaces it. What the returned chain does with `next` (call it before,
//! after, never, twice) is entirely up to the middleware.
//!
//! Any `Fn(Chain) -> Chain` is a middleware:
//!
//! ```rust,no_run
//! use strata::{Chain, Context, StatusCode};
//!
//! let deny_all = |_next: Chain| {
//!     Chain::new(|mut cx: Context| async move {
//!         cx.respond(StatusCode::FORBIDDEN);
//!         cx
//!     })
//! };
//! # let _ = strata::compose(|cx: Context| async move { cx }, &[&deny_all]);
//! ```
//!
//! Built-in middleware:
//! - [`Logging`] — logs the request target before calling next
//! - [`Counting`] — bumps the shared request counter before calling next
//! - [`Timing`] — measures how long next took, even if it panics or is cancelled

mod counting;
mod logging;
mod timing;

pub use counting::Counting;
pub use logging::Logging;
pub use timing::Timing;

use crate::chain::Chain;

/// Transforms the next handler into the one that runs in its place.
pub trait Middleware {
    fn wrap(&self, next: Chain) -> Chain;
}

impl<F> Middleware for F
where
    F: Fn(Chain) -> Chain,
{
    fn wrap(&self, next: Chain) -> Chain {
        self(next)
    }
}
