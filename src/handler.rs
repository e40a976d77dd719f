//! Handler trait and type erasure.
//!
//! # How handlers become chains
//!
//! A chain is built from handlers of *different* concrete types: a terminal
//! `async fn` plus whatever closures each middleware returns. To link them
//! we hide every concrete type behind one trait object, `dyn ErasedHandler`,
//! and hand those around as [`Chain`]s.
//!
//! ```text
//! async fn root(cx: Context) -> Context { … }     ← user writes this
//!        ↓ compose(root, &[…])
//! root.into_chain()                               ← Handler blanket impl
//!        ↓
//! Chain(Arc::new(FnHandler(root)))                ← heap-allocated wrapper
//!        ↓
//! chain.call(cx)  at request time                 ← one vtable dispatch per link
//!        ↓
//! Box::pin(root(cx))                              ← BoxFuture
//! ```
//!
//! The runtime cost per link is one virtual call and one boxed future.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::chain::Chain;
use crate::context::Context;

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future that hands the [`Context`] back.
///
/// `Send + 'static` let tokio move the future across worker threads.
pub type BoxFuture = Pin<Box<dyn Future<Output = Context> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears inside
/// the public [`Chain`] type.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, cx: Context) -> BoxFuture;
}

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid terminal handler.
///
/// You never implement this yourself. It is satisfied by any function or
/// closure with the shape:
///
/// ```text
/// async fn name(cx: Context) -> Context
/// ```
///
/// and by [`Chain`] itself, so an already-composed chain can be the terminal
/// of another one.
///
/// The trait is **sealed**: only the impls in this crate can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    fn into_chain(self) -> Chain;
}

mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut> private::Sealed for F
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Context> + Send + 'static,
{
}

impl<F, Fut> Handler for F
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Context> + Send + 'static,
{
    fn into_chain(self) -> Chain {
        Chain::from_erased(Arc::new(FnHandler(self)))
    }
}

impl private::Sealed for Chain {}

impl Handler for Chain {
    fn into_chain(self) -> Chain {
        self
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Holds a concrete handler `F` and implements [`ErasedHandler`], bridging the
/// typed world to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut> ErasedHandler for FnHandler<F>
where
    F: Fn(Context) -> Fut + Send + Sync,
    Fut: Future<Output = Context> + Send + 'static,
{
    fn call(&self, cx: Context) -> BoxFuture {
        Box::pin((self.0)(cx))
    }
}
