//! Unified error type.

/// The error type returned by strata's fallible operations.
///
/// Request-level failures (404, 405, 503) are expressed as
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// infrastructure failures: binding a listener or accepting a connection.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to bind `{addr}`: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
