//! Chain composition.
//!
//! A [`Chain`] is one terminal [`Handler`] wrapped in an ordered list of
//! [`Middleware`]. It is built once at startup and invoked once per request.
//!
//! Construction runs right-to-left: the last middleware wraps the terminal
//! first, the first middleware wraps everything else last. Invocation
//! therefore runs left-to-right:
//!
//! ```text
//! compose(t, &[&a, &b])  ==  a.wrap(b.wrap(t))
//!
//! a: before ─▶ b: before ─▶ t ─▶ b: after ─▶ a: after
//! ```

use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::handler::{BoxFuture, ErasedHandler, Handler};
use crate::middleware::Middleware;

// ── Chain ─────────────────────────────────────────────────────────────────────

/// A composed, immutable handler.
///
/// Cloning is one atomic increment; every clone runs the same links. Chains
/// need no locking to call concurrently.
#[derive(Clone)]
pub struct Chain(Arc<dyn ErasedHandler + Send + Sync + 'static>);

impl Chain {
    /// Erases a single handler into a chain with no middleware.
    pub fn new(handler: impl Handler) -> Self {
        handler.into_chain()
    }

    pub(crate) fn from_erased(inner: Arc<dyn ErasedHandler + Send + Sync + 'static>) -> Self {
        Self(inner)
    }

    /// Runs the chain for one request and resolves to the mutated context.
    pub fn call(&self, cx: Context) -> BoxFuture {
        self.0.call(cx)
    }

    /// Whether both values share the same underlying handler.
    pub fn ptr_eq(&self, other: &Chain) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain").finish_non_exhaustive()
    }
}

// ── compose ───────────────────────────────────────────────────────────────────

/// Wraps `terminal` in `middlewares`, outermost first.
///
/// `middlewares[0]` is the first code to run when the chain is called and
/// `terminal` runs last. With no middleware the result *is* the terminal.
///
/// ```rust,no_run
/// use strata::middleware::{Counting, Logging, Timing};
/// use strata::{compose, Context, RequestMetrics};
/// use std::sync::Arc;
///
/// async fn root(mut cx: Context) -> Context {
///     cx.respond("Hello Root");
///     cx
/// }
///
/// let metrics = Arc::new(RequestMetrics::new());
/// let counting = Counting::new(Arc::clone(&metrics));
/// let chain = compose(root, &[&Logging, &counting, &Timing::new()]);
/// ```
pub fn compose(terminal: impl Handler, middlewares: &[&dyn Middleware]) -> Chain {
    middlewares
        .iter()
        .rev()
        .fold(terminal.into_chain(), |next, middleware| middleware.wrap(next))
}

// ── ChainBuilder ──────────────────────────────────────────────────────────────

/// Incremental form of [`compose`] for wiring code that collects middleware
/// before it knows the terminal handler.
///
/// ```rust,no_run
/// use strata::middleware::{Logging, Timing};
/// use strata::{ChainBuilder, Context};
///
/// async fn root(cx: Context) -> Context { cx }
///
/// let chain = ChainBuilder::new()
///     .with(Logging)
///     .with(Timing::new())
///     .handler(root)
///     .build();
/// ```
#[derive(Default)]
pub struct ChainBuilder {
    middlewares: Vec<Box<dyn Middleware>>,
    terminal: Option<Chain>,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a middleware. Earlier calls run first.
    pub fn with(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middlewares.push(Box::new(middleware));
        self
    }

    /// Sets the terminal handler, replacing any previous one.
    pub fn handler(mut self, terminal: impl Handler) -> Self {
        self.terminal = Some(terminal.into_chain());
        self
    }

    /// Composes the chain.
    ///
    /// # Panics
    ///
    /// Panics if no terminal handler was set. A chain without one is a wiring
    /// bug and must stop startup, never reach a request.
    pub fn build(self) -> Chain {
        let Some(terminal) = self.terminal else {
            panic!("no terminal handler");
        };
        let middlewares: Vec<&dyn Middleware> =
            self.middlewares.iter().map(|m| &**m).collect();
        compose(terminal, &middlewares)
    }
}
