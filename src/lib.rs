//! # strata
//!
//! Ordered middleware chains around terminal handlers, served over hyper.
//!
//! ## The contract
//!
//! A [`Chain`] is one terminal handler wrapped in a list of [`Middleware`].
//! You give [`compose`] the list in the order you want it to *run*:
//!
//! ```text
//! compose(root, &[&logging, &counting, &timing])
//!
//! logging ─▶ counting ─▶ timing ─▶ root
//!                                   │
//! logging ◀─ counting ◀─ timing ◀───┘
//! ```
//!
//! Construction folds right-to-left so invocation runs left-to-right. A
//! chain is built once, never mutated, and shared by every concurrent
//! request that hits its route.
//!
//! What strata does not do: parameter binding, extractors, dependency
//! injection, per-request rebuilding. A route maps to a chain. That is all.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use strata::middleware::{Counting, Logging, Timing};
//! use strata::{Context, RequestMetrics, Router, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), strata::Error> {
//!     let metrics = Arc::new(RequestMetrics::new());
//!     let counting = Counting::new(Arc::clone(&metrics));
//!
//!     let app = Router::new()
//!         .route("/", root, &[&Logging, &counting, &Timing::new()]);
//!
//!     Server::bind("localhost:8080").serve(app).await
//! }
//!
//! async fn root(mut cx: Context) -> Context {
//!     cx.respond("Hello Root");
//!     cx
//! }
//! ```

mod chain;
mod config;
mod context;
mod error;
mod handler;
mod metrics;
mod request;
mod response;
mod router;
mod server;

pub mod middleware;

pub use chain::{Chain, ChainBuilder, compose};
pub use config::{DEFAULT_TIMEOUT, ServerConfig};
pub use context::Context;
pub use error::Error;
pub use handler::{BoxFuture, Handler};
pub use http::{Method, StatusCode, Uri};
pub use metrics::RequestMetrics;
pub use middleware::Middleware;
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
