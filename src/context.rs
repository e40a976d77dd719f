//! The per-request exchange object.
//!
//! A [`Context`] is moved into a chain and handed back out of it, mutated:
//! the request on the way in, the response on the way back. Chains never
//! look inside it; only handlers and middleware do.

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// One request and the response being built for it.
#[derive(Debug)]
pub struct Context {
    request: Request,
    response: Response,
}

impl Context {
    /// Starts an exchange with a default `200 OK`, empty response.
    pub fn new(request: Request) -> Self {
        Self { request, response: Response::default() }
    }

    pub fn request(&self) -> &Request { &self.request }
    pub fn request_mut(&mut self) -> &mut Request { &mut self.request }
    pub fn response(&self) -> &Response { &self.response }
    pub fn response_mut(&mut self) -> &mut Response { &mut self.response }

    /// Replaces the response. Later calls win.
    pub fn respond(&mut self, response: impl IntoResponse) {
        self.response = response.into_response();
    }

    pub fn into_response(self) -> Response {
        self.response
    }
}

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode, Uri};

    use super::*;

    #[test]
    fn debug_shows_request_and_response() {
        let mut cx = Context::new(Request::new(Method::GET, Uri::from_static("/users?page=2")));
        cx.respond(StatusCode::ACCEPTED);

        let shown = format!("{cx:?}");
        assert!(shown.contains("/users?page=2"), "{shown}");
        assert!(shown.contains("202"), "{shown}");
    }
}
