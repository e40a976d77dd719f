//! Radix-tree route registry.
//!
//! One tree per HTTP method, plus one tree for routes that answer every
//! method. O(path-length) lookup. A route maps to exactly one [`Chain`];
//! everything interesting happens inside the chain.

use std::collections::HashMap;

use http::Method;
use matchit::Router as MatchitRouter;

use crate::chain::{Chain, compose};
use crate::handler::Handler;
use crate::middleware::Middleware;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Every registration returns `self` so calls chain naturally.
#[derive(Default)]
pub struct Router {
    routes: HashMap<Method, MatchitRouter<Chain>>,
    any: MatchitRouter<Chain>,
}

/// Outcome of a route lookup.
pub(crate) enum Lookup {
    Found(Chain, HashMap<String, String>),
    /// The path exists, but only for these other methods.
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Composes `terminal` with `middlewares` and registers the chain for
    /// every method on `path`.
    ///
    /// ```rust,no_run
    /// # use strata::{Context, Router};
    /// # use strata::middleware::{Logging, Timing};
    /// # async fn root(cx: Context) -> Context { cx }
    /// Router::new().route("/", root, &[&Logging, &Timing::new()]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed or already registered.
    pub fn route(self, path: &str, terminal: impl Handler, middlewares: &[&dyn Middleware]) -> Self {
        let chain = compose(terminal, middlewares);
        self.any(path, chain)
    }

    /// Registers a handler (or an already composed [`Chain`]) for every method.
    pub fn any(mut self, path: &str, handler: impl Handler) -> Self {
        insert(&mut self.any, path, handler);
        self
    }

    /// Registers a handler for one method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `cx.request().param("name")`
    /// retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed or already registered for `method`.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        insert(self.routes.entry(method).or_default(), path, handler);
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::POST, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::PUT, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::DELETE, path, handler)
    }

    pub(crate) fn lookup(&self, method: &Method, path: &str) -> Lookup {
        let matched = self.routes
            .get(method)
            .and_then(|tree| tree.at(path).ok())
            .or_else(|| self.any.at(path).ok());

        if let Some(matched) = matched {
            let params = matched.params.iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect();
            return Lookup::Found(matched.value.clone(), params);
        }

        let mut allowed: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(m, _)| m.clone())
            .collect();
        if allowed.is_empty() {
            return Lookup::NotFound;
        }
        allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Lookup::MethodNotAllowed(allowed)
    }
}

fn insert(tree: &mut MatchitRouter<Chain>, path: &str, handler: impl Handler) {
    tree.insert(path, handler.into_chain())
        .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
}
